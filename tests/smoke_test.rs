//! Smoke test - ensures basic parse/resolve/validate/run works end-to-end
//!
//! This test catches regressions that would break core functionality.
//! Run with: cargo test smoke_test

mod helpers;

use calpipe::core::contract::validate;
use calpipe::execution::{Driver, ExecutionEvent, LoggingRunner, RunStatus};
use helpers::{resolve_doc, FRINGE_DOC};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn smoke_test_fringe_pipeline() {
    let pipeline = resolve_doc(FRINGE_DOC).expect("Should resolve");

    let report = validate(&pipeline).expect("Should validate");
    assert!(report.is_valid());

    let events: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    let mut driver = Driver::new(LoggingRunner);
    driver.add_event_handler(move |event| {
        if let ExecutionEvent::TaskCompleted { task, .. } = event {
            sink.borrow_mut().push(task.clone());
        }
    });

    let summary = driver.execute(&pipeline);
    assert_eq!(summary.status, RunStatus::Completed);
    assert_eq!(summary.tasks_run, 3);
    assert_eq!(
        *events.borrow(),
        vec!["isr", "cpFringe", "cpFringeCombine"]
    );
}
