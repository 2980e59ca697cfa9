use comfy_table::Table;
use hermes_refinement::controller::refinement_report::RefinementReport;

struct SummaryRow {
    iteration: usize,
    relaxed: bool,
    cells: [String; 4],
    strategies: String,
}

/// One row per attempt, in the order they were made.
pub fn iterations_table(report: &RefinementReport) -> Table {
    let best = report.best().map(|best| (best.iteration, best.relaxed));

    let mut rows: Vec<SummaryRow> = report
        .records()
        .iter()
        .map(|record| {
            let compliance = record.analysis.metrics.compliance();
            let marker = if best == Some((record.iteration, record.relaxed)) {
                "best"
            } else {
                "ok"
            };

            SummaryRow {
                iteration: record.iteration,
                relaxed: record.relaxed,
                cells: [
                    marker.to_string(),
                    record.analysis.route_count().to_string(),
                    compliance.map_or_else(String::new, |c| format!("{:.1}%", c.compliance_rate())),
                    compliance.map_or_else(String::new, |c| format!("{:.0}", c.total_load_gap())),
                ],
                strategies: describe(record.strategies.iter().map(|s| s.strategy.to_string())),
            }
        })
        .chain(report.failures().iter().map(|failure| SummaryRow {
            iteration: failure.iteration,
            relaxed: failure.relaxed,
            cells: [
                failure.reason.to_string(),
                String::new(),
                String::new(),
                String::new(),
            ],
            strategies: describe(failure.strategies.iter().map(|s| s.strategy.to_string())),
        }))
        .collect();

    rows.sort_by_key(|row| (row.iteration, row.relaxed));

    let mut table = Table::new();
    table.set_header(vec![
        "Iteration",
        "Relaxed",
        "Result",
        "Routes",
        "Compliance",
        "Load gap",
        "Strategies",
    ]);

    for row in rows {
        let [result, routes, compliance, gap] = row.cells;
        table.add_row(vec![
            row.iteration.to_string(),
            if row.relaxed { "yes" } else { "" }.to_string(),
            result,
            routes,
            compliance,
            gap,
            row.strategies,
        ]);
    }

    table
}

fn describe(strategies: impl Iterator<Item = String>) -> String {
    strategies.collect::<Vec<_>>().join(", ")
}
