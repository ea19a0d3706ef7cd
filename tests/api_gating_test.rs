// ==========================================
// 认证闸门集成测试
// ==========================================
// 测试目标: 受保护操作（入库/报废/批量导入）先过闸门，
//           其余操作不受闸门影响
// ==========================================


use asset_ledger::api::{ApiError, FileHashGate};
use asset_ledger::logging;
use sha2::{Digest, Sha256};
use std::io::Write;
use std::sync::Arc;
use test_helpers::{borrower, candidate, create_gated_ledger, seed_asset};

fn key_gate(content: &[u8]) -> Arc<FileHashGate> {
    let digest = format!("{:x}", Sha256::digest(content));
    Arc::new(FileHashGate::new(digest, 60))
}

#[test]
fn test_protected_operations_require_authorization() {
    logging::init_test();
    let gate = key_gate(b"clave");
    let ledger = create_gated_ledger(gate);

    assert!(matches!(
        ledger.api.add_asset(&candidate(1)).unwrap_err(),
        ApiError::Unauthorized
    ));
    assert!(matches!(
        ledger.api.decommission("R40022101", true).unwrap_err(),
        ApiError::Unauthorized
    ));
    assert!(matches!(
        ledger.api.import_candidates(&[candidate(1)]).unwrap_err(),
        ApiError::Unauthorized
    ));
}

#[test]
fn test_key_file_opens_window_for_protected_operations() {
    let gate = key_gate(b"clave");
    let ledger = create_gated_ledger(gate.clone());

    let mut key_file = tempfile::NamedTempFile::new().unwrap();
    key_file.write_all(b"clave").unwrap();
    assert!(gate.present_key_file(key_file.path()).unwrap());

    ledger.api.add_asset(&candidate(1)).unwrap();
    assert_eq!(ledger.api.list_assets().unwrap().len(), 1);
}

#[test]
fn test_wrong_key_file_keeps_gate_closed() {
    let gate = key_gate(b"clave");
    let ledger = create_gated_ledger(gate.clone());

    let mut key_file = tempfile::NamedTempFile::new().unwrap();
    key_file.write_all(b"incorrecta").unwrap();
    assert!(!gate.present_key_file(key_file.path()).unwrap());

    assert!(matches!(
        ledger.api.add_asset(&candidate(1)).unwrap_err(),
        ApiError::Unauthorized
    ));
}

#[test]
fn test_lifecycle_operations_bypass_the_gate() {
    // 借出/归还/维修不属于受保护操作
    let gate = key_gate(b"clave");
    let ledger = create_gated_ledger(gate.clone());

    // 先经认证入库一台
    let mut key_file = tempfile::NamedTempFile::new().unwrap();
    key_file.write_all(b"clave").unwrap();
    gate.present_key_file(key_file.path()).unwrap();
    let num = seed_asset(&ledger, 2);

    // 闸门收回后，生命周期操作照常
    let mut bad = tempfile::NamedTempFile::new().unwrap();
    bad.write_all(b"otra").unwrap();
    gate.present_key_file(bad.path()).unwrap();

    ledger.api.open_loan(&num, &borrower()).unwrap();
    ledger.api.close_loan(&num).unwrap();
}
