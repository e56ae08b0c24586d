use super::*;

struct Fixed(TesterResult<()>);

impl Job for Fixed {
    fn label(&self) -> String {
        "fixed".to_string()
    }

    fn run(&self) -> TesterResult<()> {
        match &self.0 {
            Ok(()) => Ok(()),
            Err(e) if e.is_skip() => Err(TesterError::skipped("skip")),
            Err(_) => Err(TesterError::render("boom")),
        }
    }
}

struct Panics;

impl Job for Panics {
    fn label(&self) -> String {
        "panics".to_string()
    }

    fn run(&self) -> TesterResult<()> {
        panic!("job exploded");
    }
}

#[test]
fn zero_workers_is_rejected() {
    assert!(matches!(
        TaskOrchestrator::new("t", 0),
        Err(TesterError::Validation(_))
    ));
}

#[test]
fn outcomes_are_counted() {
    let orch = TaskOrchestrator::new("t", 2).unwrap();
    let jobs = vec![
        Fixed(Ok(())),
        Fixed(Ok(())),
        Fixed(Err(TesterError::skipped("x"))),
        Fixed(Err(TesterError::render("x"))),
    ];
    let stats = orch.run(jobs).unwrap();
    assert_eq!(
        stats,
        RunStats {
            total: 4,
            dispatched: 4,
            succeeded: 2,
            failed: 2
        }
    );
    assert_eq!(stats.percent_complete(), 100);
    assert!(!stats.all_succeeded());
}

#[test]
fn a_panicking_job_counts_as_failure() {
    let orch = TaskOrchestrator::new("t", 1).unwrap();
    let stats = orch.run(vec![Panics, Panics]).unwrap();
    assert_eq!(stats.failed, 2);
    assert_eq!(stats.succeeded, 0);
}

#[test]
fn empty_run_is_complete() {
    let orch = TaskOrchestrator::new("t", 3).unwrap();
    let stats = orch.run(Vec::<Fixed>::new()).unwrap();
    assert_eq!(stats, RunStats::default());
    assert_eq!(stats.percent_complete(), 100);
    assert!(stats.all_succeeded());
}

#[test]
fn percent_complete_rounds_down() {
    let s = RunStats {
        total: 3,
        dispatched: 3,
        succeeded: 1,
        failed: 0,
    };
    assert_eq!(s.percent_complete(), 33);
}
