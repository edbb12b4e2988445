//! Vantage CLI Rendering
//!
//! Plain-text tables for the `users`, `user`, `scope` and `metrics`
//! commands. `--json` output bypasses this module.
//!
//! @version 0.1.0
//! @author Vantage Development Team

use vantage_directory::{DirectoryRecord, Page};
use vantage_selection::SelectionState;
use vantage_timeseries::{MetricKind, MetricsView};

pub fn users_table(page: &Page<DirectoryRecord>) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<12} {:<24} {:<32} {:<16} {:<6} {}\n",
        "ID", "NAME", "EMAIL", "ORG", "ACTIVE", "ROLES"
    ));

    for user in &page.items {
        let roles: Vec<&str> = user.roles.iter().map(String::as_str).collect();
        out.push_str(&format!(
            "{:<12} {:<24} {:<32} {:<16} {:<6} {}\n",
            user.id,
            user.cn,
            user.email,
            user.org.as_deref().unwrap_or("-"),
            if user.is_active { "yes" } else { "no" },
            roles.join(",")
        ));
    }

    out.push_str(&format!(
        "page {}/{} ({} matching)\n",
        page.page_number,
        page.total_pages().max(1),
        page.total_count
    ));
    out
}

pub fn user_detail(user: &DirectoryRecord) -> String {
    let mut out = String::new();
    let mut line = |label: &str, value: &str| out.push_str(&format!("{:<14} {}\n", label, value));

    line("id", &user.id);
    line("name", &user.cn);
    line("email", &user.email);
    line("manager", user.manager.as_deref().unwrap_or("-"));
    line("org", user.org.as_deref().unwrap_or("-"));
    line("business unit", user.business_unit.as_deref().unwrap_or("-"));
    line("slack", user.slack_handle.as_deref().unwrap_or("-"));
    line("roles", &user.roles.iter().cloned().collect::<Vec<_>>().join(", "));
    line("active", if user.is_active { "yes" } else { "no" });
    let last_login = user
        .last_login
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "never".to_string());
    line("last login", &last_login);
    out
}

pub fn selection(state: &SelectionState) -> String {
    let mut out = String::new();
    let marker = |selected: bool| if selected { "*" } else { " " };

    out.push_str("vCenters:\n");
    for option in &state.vcenters {
        let selected = state.scope.v_center_id.as_deref() == Some(option.id.as_str());
        out.push_str(&format!("  {} {:<12} {}\n", marker(selected), option.id, option.name));
    }

    out.push_str("clusters:\n");
    if state.clusters.is_empty() {
        out.push_str("  (none)\n");
    }
    for option in &state.clusters {
        let selected = state.scope.cluster_id.as_deref() == Some(option.id.as_str());
        out.push_str(&format!("  {} {:<12} {}\n", marker(selected), option.id, option.name));
    }

    out.push_str("tags:\n");
    for option in &state.tags {
        let selected = state.scope.tag_ids.contains(&option.id);
        out.push_str(&format!("  {} {:<12} {}\n", marker(selected), option.id, option.name));
    }
    out
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| format!("{:.1}", v)).unwrap_or_else(|| "-".to_string())
}

pub fn metrics(view: &MetricsView) -> String {
    if view.loading.is_loading {
        return "loading...\n".to_string();
    }
    if view.loading.is_empty {
        return "no usage data for this scope\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!("{:<12} {:>8} {:>8} {:>8}\n", "TIMESTAMP", "CPU", "MEMORY", "STORAGE"));
    for point in &view.points {
        out.push_str(&format!(
            "{:<12} {:>8} {:>8} {:>8}\n",
            point.timestamp_seconds,
            cell(point.cpu),
            cell(point.memory),
            cell(point.storage)
        ));
    }

    out.push('\n');
    out.push_str(&summary(view));
    if !view.loading.loading_complete {
        out.push_str("(some sources still loading)\n");
    }
    out
}

/// Per-metric latest / average / peak lines.
pub fn summary(view: &MetricsView) -> String {
    let mut out = String::new();
    for kind in MetricKind::ALL {
        if let Some(summary) = view.summary.get(kind) {
            out.push_str(&format!(
                "{:<8} latest {:.1}  avg {:.1}  peak {:.1}  ({} samples)\n",
                kind.as_str(),
                summary.latest,
                summary.average,
                summary.peak,
                summary.samples
            ));
        }
    }
    out
}
