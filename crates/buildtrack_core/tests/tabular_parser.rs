use buildtrack_core::import::tabular::HEADER;
use buildtrack_core::{parse_grid, parse_source, ImportFormat, ImportSource, Priority, TaskStatus};
use chrono::NaiveDate;

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|cell| cell.to_string()).collect()
}

#[test]
fn header_only_grid_produces_no_records() {
    assert!(parse_grid(&[row(&HEADER)]).is_empty());
}

#[test]
fn title_only_row_gets_all_defaults() {
    let records = parse_grid(&[row(&HEADER), row(&["Install handrail"])]);
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.title, "Install handrail");
    assert_eq!(record.priority, Priority::Medium);
    assert_eq!(record.status, TaskStatus::Backlog);
    assert_eq!(record.description, "");
    assert_eq!(record.due_date, None);
    assert_eq!(record.assignee_email, None);
}

#[test]
fn full_rows_map_positionally_in_row_order() {
    let rows = vec![
        row(&HEADER),
        row(&["Lay bricks", "High", "Blocked", "North wall", "2025-04-01", "mason@site.io"]),
        row(&["", "Low"]),
        row(&["Plaster", "low", "Waiting for Approval", "", "04/01/2025", ""]),
    ];
    let records = parse_grid(&rows);
    assert_eq!(records.len(), 2);

    assert_eq!(records[0].title, "Lay bricks");
    assert_eq!(records[0].priority, Priority::High);
    assert_eq!(records[0].status, TaskStatus::Blocked);
    assert_eq!(records[0].description, "North wall");
    assert_eq!(records[0].due_date, NaiveDate::from_ymd_opt(2025, 4, 1));
    assert_eq!(records[0].assignee_email.as_deref(), Some("mason@site.io"));

    assert_eq!(records[1].title, "Plaster");
    assert_eq!(records[1].status, TaskStatus::WaitingForApproval);
    assert_eq!(records[1].due_date, None);
    assert_eq!(records[1].assignee_email, None);
}

#[test]
fn reordered_header_is_not_detected() {
    let rows = vec![
        row(&["priority", "title"]),
        row(&["High", "Inspect scaffold"]),
    ];
    let records = parse_grid(&rows);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "High");
    assert_eq!(records[0].priority, Priority::Medium);
}

#[test]
fn parse_source_dispatches_on_shape() {
    let grid = ImportSource::Grid(vec![row(&HEADER), row(&["Wire panel", "High"])]);
    let batch = parse_source(&grid);
    assert_eq!(batch.records.len(), 1);
    assert_eq!(batch.rejected, 0);

    let text = ImportSource::Text("# Task: Wire panel\n**Priority:** High".to_string());
    assert_eq!(parse_source(&text).records, batch.records);
}

#[test]
fn quoted_multiline_tsv_cell_stays_one_task() {
    let bytes = b"title\tpriority\tstatus\tdescription\n\"Pour slab\"\tHigh\tBacklog\t\"Line one\nLine two\"\n";
    let source = ImportSource::from_bytes(ImportFormat::TabSeparated, bytes).unwrap();

    let batch = parse_source(&source);

    assert_eq!(batch.rejected, 0);
    assert_eq!(batch.records.len(), 1);
    assert_eq!(batch.records[0].title, "Pour slab");
    assert_eq!(batch.records[0].priority, Priority::High);
    assert_eq!(batch.records[0].description, "Line one\nLine two");
}
