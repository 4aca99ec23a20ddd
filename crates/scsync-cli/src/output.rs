use colored::Colorize;
use scsync_engine::SyncReport;
use tabled::builder::Builder;
use tabled::settings::Style;

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

fn count(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.len().to_string()
    }
}

/// One row per manifest.
pub fn print_report(report: &SyncReport) {
    if report.manifests.is_empty() {
        println!("No manifests found.");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record([
        "Portfolio", "Id", "Created", "+Products", "~Products", "Skipped", "Uploads", "+Shares",
        "-Shares", "Policy",
    ]);
    for m in &report.manifests {
        builder.push_record([
            m.portfolio.clone(),
            m.portfolio_id.clone(),
            if m.portfolio_created { "yes" } else { "no" }.to_string(),
            count(&m.products_created),
            count(&m.products_updated),
            count(&m.products_skipped),
            count(&m.uploads),
            count(&m.shares_added),
            count(&m.shares_removed),
            if m.policy_statement_appended { "appended" } else { "-" }.to_string(),
        ]);
    }
    let table = builder.build().with(Style::rounded()).to_string();
    println!("{table}");
}
