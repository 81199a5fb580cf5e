use std::fmt::Write;

use super::server_metrics::ServerMetrics;

pub fn render_prometheus(m: &ServerMetrics) -> String {
    let mut out = String::with_capacity(1024);

    write_counter(&mut out, "fleetwatch_rest_requests_total", m.rest_requests_total());
    write_counter(&mut out, "fleetwatch_rules_created_total", m.rules_created_total());
    write_counter(&mut out, "fleetwatch_rules_updated_total", m.rules_updated_total());
    write_counter(&mut out, "fleetwatch_rules_deleted_total", m.rules_deleted_total());
    write_counter(&mut out, "fleetwatch_rules_toggled_total", m.rules_toggled_total());
    write_counter(&mut out, "fleetwatch_rule_not_found_total", m.not_found_total());
    write_counter(&mut out, "fleetwatch_store_errors_total", m.store_errors_total());
    write_counter(&mut out, "fleetwatch_auth_failures_total", m.auth_failures_total());

    out
}

fn write_counter(out: &mut String, name: &str, val: u64) {
    let _ = writeln!(out, "# TYPE {name} counter");
    let _ = writeln!(out, "{name} {val}");
}
