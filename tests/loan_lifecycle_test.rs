// ==========================================
// 借出生命周期集成测试
// ==========================================
// 测试目标: 借出/归还全流程与"至多一条未归还记录"不变式
// ==========================================


use asset_ledger::api::{ApiError, AssetStatus};
use asset_ledger::engine::EngineError;
use asset_ledger::logging;
use asset_ledger::repository::LoanRepository;
use asset_ledger::storage::CsvTableStore;
use std::sync::Arc;
use test_helpers::{borrower, create_test_ledger, seed_asset};

fn loan_repo(ledger: &test_helpers::TestLedger) -> LoanRepository {
    LoanRepository::new(Arc::new(CsvTableStore::new()), ledger.paths.loans())
}

#[test]
fn test_loan_round_trip_scenario() {
    logging::init_test();
    let ledger = create_test_ledger();
    let num = seed_asset(&ledger, 4);

    // 新入库资产可用
    assert!(ledger.api.get_asset(&num).unwrap().unwrap().available);

    // 借出：可用标志翻转，恰有一条未归还记录
    ledger.api.open_loan(&num, &borrower()).unwrap();
    assert!(!ledger.api.get_asset(&num).unwrap().unwrap().available);

    let repo = loan_repo(&ledger);
    let open: Vec<_> = repo
        .list_for(&num)
        .unwrap()
        .into_iter()
        .filter(|r| r.is_open())
        .collect();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].borrower_name, "Ana Rivera");

    // 归还：可用恢复，记录闭合且归还时刻不早于借出时刻
    let closed = ledger.api.close_loan(&num).unwrap();
    assert!(!closed.is_open());
    assert!(closed.returned_at >= closed.loaned_at);
    assert!(ledger.api.get_asset(&num).unwrap().unwrap().available);

    let records = repo.list_for(&num).unwrap();
    assert_eq!(records.len(), 1);
    assert!(records.iter().all(|r| !r.is_open()));
}

#[test]
fn test_at_most_one_open_loan_over_repeated_cycles() {
    let ledger = create_test_ledger();
    let num = seed_asset(&ledger, 5);
    let repo = loan_repo(&ledger);

    for _ in 0..3 {
        ledger.api.open_loan(&num, &borrower()).unwrap();
        let open = repo
            .list_for(&num)
            .unwrap()
            .iter()
            .filter(|r| r.is_open())
            .count();
        assert_eq!(open, 1);
        ledger.api.close_loan(&num).unwrap();
        assert!(!repo.has_open(&num).unwrap());
    }

    let records = repo.list_for(&num).unwrap();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| !r.is_open()));
}

#[test]
fn test_open_loan_while_on_loan_is_rejected() {
    let ledger = create_test_ledger();
    let num = seed_asset(&ledger, 6);

    ledger.api.open_loan(&num, &borrower()).unwrap();
    let err = ledger.api.open_loan(&num, &borrower()).unwrap_err();
    assert!(matches!(
        err,
        ApiError::Engine(EngineError::AlreadyOnLoan(_))
    ));
}

#[test]
fn test_close_loan_without_open_record() {
    let ledger = create_test_ledger();
    let num = seed_asset(&ledger, 7);

    let err = ledger.api.close_loan(&num).unwrap_err();
    assert!(matches!(err, ApiError::Engine(EngineError::NoOpenLoan(_))));
}

#[test]
fn test_close_picks_most_recently_appended_open_record() {
    // 历史数据不一致：两条未归还记录并存时，归还应闭合后一条
    let ledger = create_test_ledger();
    let num = seed_asset(&ledger, 8);
    let repo = loan_repo(&ledger);

    repo.append_open(&num, &borrower(), "2026-01-01 09:00:00").unwrap();
    repo.append_open(&num, &borrower(), "2026-02-01 09:00:00").unwrap();

    ledger.api.close_loan(&num).unwrap();

    let records = repo.list_for(&num).unwrap();
    assert!(records[0].is_open(), "older record stays open");
    assert!(!records[1].is_open(), "newest record is closed");
}

#[test]
fn test_dashboard_counts_follow_loan_state() {
    let ledger = create_test_ledger();
    let a = seed_asset(&ledger, 9);
    let _b = seed_asset(&ledger, 10);

    ledger.api.open_loan(&a, &borrower()).unwrap();

    let counts = ledger.api.dashboard().inventory_counts().unwrap();
    assert_eq!(counts.total, 2);
    assert_eq!(counts.on_loan, 1);
    assert_eq!(counts.available, 1);

    let summary = ledger.api.dashboard().asset_summary(&a).unwrap().unwrap();
    assert_eq!(summary.status, AssetStatus::OnLoan);
    assert_eq!(summary.loan_count, 1);
}
