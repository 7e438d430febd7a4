use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, U256};
use gaslite::calls::{Erc20Query, WriteRequest};
use gaslite::chain::{BAOBAB_CHAIN_ID, DROP_CONTRACT_BAOBAB, DROP_CONTRACT_CYPRESS};
use gaslite::units::UnitsError;

use crate::controller::DropController;
use crate::error::WorkflowError;
use crate::mock::{token_info_results, tx_hash, MockProvider, MOCK_OWNER};
use crate::provider::{ProviderError, TxReceipt};
use crate::state::SubmissionState;

const TOKEN: &str = "0xfbafe784a4ee4fb559636cec7f760158ea90f86f";
const ALICE: &str = "0x1B7a0b3E366CC0549A96ED4123E8058d59282f3f";
const BOB: &str = "0x6a672dD588577E3d4b57c45CDDA243129b80847d";

fn wei(whole: u64) -> U256 {
    U256::from(whole) * U256::from(10u8).pow(U256::from(18u8))
}

fn addr(hex: &str) -> Address {
    Address::from_str(hex).unwrap()
}

fn setup(chain_id: u64) -> (Arc<MockProvider>, DropController) {
    let provider = MockProvider::connected(chain_id);
    let controller = DropController::new(provider.clone());
    (provider, controller)
}

#[tokio::test]
async fn approval_scales_amount_by_cached_token_decimals() -> anyhow::Result<()> {
    let (provider, controller) = setup(BAOBAB_CHAIN_ID);
    provider.push_read(Ok(token_info_results("USDT", "Tether", 6, U256::ZERO)));

    let info = controller.refresh_token_info(TOKEN).await?.unwrap();
    assert_eq!(info.decimals, 6);
    assert_eq!(info.symbol, "USDT");

    let hash = controller.submit_approval(TOKEN, "50").await?;
    assert_eq!(
        provider.recorded_writes(),
        vec![WriteRequest::erc20_approve(
            addr(TOKEN),
            DROP_CONTRACT_BAOBAB,
            U256::from(50_000_000u64)
        )]
    );
    assert_eq!(
        controller.approve_state(),
        SubmissionState::Confirmed { hash }
    );
    Ok(())
}

#[tokio::test]
async fn approval_defaults_to_eighteen_decimals_without_metadata() -> anyhow::Result<()> {
    let (provider, controller) = setup(BAOBAB_CHAIN_ID);
    controller.submit_approval(TOKEN, "50").await?;

    let writes = provider.recorded_writes();
    assert_eq!(
        writes,
        vec![WriteRequest::erc20_approve(
            addr(TOKEN),
            DROP_CONTRACT_BAOBAB,
            wei(50)
        )]
    );
    Ok(())
}

#[tokio::test]
async fn approval_rejects_malformed_amount_before_any_wallet_call() {
    let (provider, controller) = setup(BAOBAB_CHAIN_ID);
    let err = controller.submit_approval(TOKEN, "fifty").await.unwrap_err();
    assert_eq!(err, WorkflowError::Units(UnitsError::InvalidCharacter('f')));

    assert!(provider.recorded_writes().is_empty());
    assert!(provider.recorded_reads().is_empty());
    assert_eq!(controller.approve_state(), SubmissionState::Idle);
}

#[tokio::test]
async fn rejected_signature_fails_without_recording_a_hash() {
    let (provider, controller) = setup(BAOBAB_CHAIN_ID);
    let gate = provider.push_gated_write(Err(ProviderError::Rejected(None)));
    let controller = Arc::new(controller);

    let task = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.submit_approval(TOKEN, "50").await })
    };
    while controller.approve_state() != SubmissionState::PendingSignature {
        tokio::task::yield_now().await;
    }
    assert_eq!(controller.approve_state().hash(), None);

    gate.notify_one();
    let err = task.await.unwrap().unwrap_err();
    assert_eq!(
        err,
        WorkflowError::Provider(ProviderError::Rejected(None))
    );
    assert_eq!(
        controller.approve_state(),
        SubmissionState::Failed {
            reason: "user rejected the request".to_string()
        }
    );
    assert_eq!(controller.approve_state().hash(), None);
}

#[tokio::test]
async fn overlapping_submission_is_refused_while_in_flight() {
    let (provider, controller) = setup(BAOBAB_CHAIN_ID);
    let gate = provider.push_gated_write(Ok(tx_hash(0x11)));
    let controller = Arc::new(controller);

    let task = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.submit_approval(TOKEN, "50").await })
    };
    while !controller.approve_state().is_in_flight() {
        tokio::task::yield_now().await;
    }

    let err = controller.submit_approval(TOKEN, "50").await.unwrap_err();
    assert_eq!(
        err,
        WorkflowError::OperationInFlight {
            operation: "approve"
        }
    );
    // The refused submission must not have reached the wallet.
    assert_eq!(provider.recorded_writes().len(), 1);

    gate.notify_one();
    assert_eq!(task.await.unwrap().unwrap(), tx_hash(0x11));
    assert_eq!(
        controller.approve_state(),
        SubmissionState::Confirmed { hash: tx_hash(0x11) }
    );
}

#[tokio::test]
async fn reverted_receipt_lands_in_failed() {
    let (provider, controller) = setup(BAOBAB_CHAIN_ID);
    provider.push_write(Ok(tx_hash(0x07)));
    provider.set_receipt(
        tx_hash(0x07),
        Ok(TxReceipt {
            hash: tx_hash(0x07),
            status: false,
            confirmations: 1,
        }),
    );

    let err = controller.submit_approval(TOKEN, "50").await.unwrap_err();
    assert_eq!(err, WorkflowError::Provider(ProviderError::Reverted(None)));
    assert_eq!(
        controller.approve_state(),
        SubmissionState::Failed {
            reason: "transaction reverted".to_string()
        }
    );
}

#[tokio::test]
async fn erc20_airdrop_passes_ordered_arrays_and_total() -> anyhow::Result<()> {
    let (provider, controller) = setup(BAOBAB_CHAIN_ID);
    controller
        .submit_airdrop_erc20(TOKEN, &format!("{ALICE},{BOB}"), "25,25", "50")
        .await?;

    let writes = provider.recorded_writes();
    assert_eq!(
        writes,
        vec![WriteRequest::airdrop_erc20(
            DROP_CONTRACT_BAOBAB,
            addr(TOKEN),
            vec![addr(ALICE), addr(BOB)],
            vec![wei(25), wei(25)],
            wei(50)
        )]
    );
    assert!(matches!(
        controller.airdrop_state(),
        SubmissionState::Confirmed { .. }
    ));
    Ok(())
}

#[tokio::test]
async fn erc20_airdrop_threads_fetched_decimals_into_amounts() -> anyhow::Result<()> {
    let (provider, controller) = setup(BAOBAB_CHAIN_ID);
    provider.push_read(Ok(token_info_results("USDT", "Tether", 6, U256::MAX)));

    controller
        .submit_airdrop_erc20(TOKEN, ALICE, "25", "25")
        .await?;

    let writes = provider.recorded_writes();
    assert_eq!(
        writes,
        vec![WriteRequest::airdrop_erc20(
            DROP_CONTRACT_BAOBAB,
            addr(TOKEN),
            vec![addr(ALICE)],
            vec![U256::from(25_000_000u64)],
            U256::from(25_000_000u64)
        )]
    );
    Ok(())
}

#[tokio::test]
async fn erc20_airdrop_requires_sufficient_allowance() {
    let (provider, controller) = setup(BAOBAB_CHAIN_ID);
    provider.push_read(Ok(token_info_results("TST", "Test Token", 18, wei(49))));

    let err = controller
        .submit_airdrop_erc20(TOKEN, &format!("{ALICE},{BOB}"), "25,25", "50")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        WorkflowError::InsufficientAllowance {
            allowance: wei(49),
            total: wei(50)
        }
    );
    assert!(provider.recorded_writes().is_empty());
    assert_eq!(controller.airdrop_state(), SubmissionState::Idle);
}

#[tokio::test]
async fn erc20_airdrop_rejects_mismatched_list_lengths() {
    let (provider, controller) = setup(BAOBAB_CHAIN_ID);
    let err = controller
        .submit_airdrop_erc20(TOKEN, &format!("{ALICE},{BOB}"), "25", "50")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        WorkflowError::LengthMismatch {
            recipients: 2,
            amounts: 1
        }
    );
    assert!(provider.recorded_writes().is_empty());
}

#[tokio::test]
async fn native_airdrop_attaches_total_as_value() -> anyhow::Result<()> {
    let (provider, controller) = setup(BAOBAB_CHAIN_ID);
    controller
        .submit_airdrop_native(&format!("{ALICE},{BOB}"), "25,25", "50")
        .await?;

    let writes = provider.recorded_writes();
    assert_eq!(
        writes,
        vec![WriteRequest::airdrop_eth(
            DROP_CONTRACT_BAOBAB,
            vec![addr(ALICE), addr(BOB)],
            vec![wei(25), wei(25)],
            wei(50)
        )]
    );
    assert_eq!(writes[0].value, wei(50));
    // No token metadata involved for the native coin.
    assert!(provider.recorded_reads().is_empty());
    Ok(())
}

#[tokio::test]
async fn operations_fail_independently() -> anyhow::Result<()> {
    let (provider, controller) = setup(BAOBAB_CHAIN_ID);
    controller
        .submit_airdrop_native(&format!("{ALICE},{BOB}"), "25,25", "50")
        .await?;
    let airdrop_before = controller.airdrop_state();
    assert!(matches!(
        airdrop_before,
        SubmissionState::Confirmed { .. }
    ));

    provider.push_write(Err(ProviderError::Rejected(Some(
        "user denied transaction".to_string(),
    ))));
    let err = controller.submit_approval(TOKEN, "50").await.unwrap_err();
    assert_eq!(
        err,
        WorkflowError::Provider(ProviderError::Rejected(Some(
            "user denied transaction".to_string()
        )))
    );

    assert_eq!(
        controller.approve_state(),
        SubmissionState::Failed {
            reason: "user denied transaction".to_string()
        }
    );
    assert_eq!(controller.airdrop_state(), airdrop_before);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn latest_refresh_wins_the_metadata_race() -> anyhow::Result<()> {
    let (provider, controller) = setup(BAOBAB_CHAIN_ID);
    provider.push_read_delayed(
        Duration::from_millis(50),
        Ok(token_info_results("OLD", "Old Token", 18, U256::ZERO)),
    );
    provider.push_read(Ok(token_info_results("NEW", "New Token", 18, U256::ZERO)));

    // The user pastes a new address while the first read is still in flight.
    let (first, second) = tokio::join!(
        controller.refresh_token_info(TOKEN),
        controller.refresh_token_info(ALICE),
    );

    assert_eq!(first?, None);
    assert_eq!(second?.unwrap().symbol, "NEW");
    let current = controller.token_info().unwrap();
    assert_eq!(current.symbol, "NEW");
    assert_eq!(current.address, addr(ALICE));
    Ok(())
}

#[tokio::test]
async fn read_failure_clears_cached_metadata() -> anyhow::Result<()> {
    let (provider, controller) = setup(BAOBAB_CHAIN_ID);
    provider.push_read(Ok(token_info_results("TST", "Test Token", 18, U256::ZERO)));
    controller.refresh_token_info(TOKEN).await?;
    assert!(controller.token_info().is_some());

    provider.push_read(Err(ProviderError::Rpc("no code at address".to_string())));
    let err = controller.refresh_token_info(TOKEN).await.unwrap_err();
    assert!(matches!(err, WorkflowError::ReadFailure { .. }));
    assert_eq!(controller.token_info(), None);
    Ok(())
}

#[tokio::test]
async fn spender_follows_the_active_chain() -> anyhow::Result<()> {
    // Any chain id other than Baobab resolves to the Cypress deployment.
    let (provider, controller) = setup(1);
    controller.refresh_token_info(TOKEN).await?;

    let reads = provider.recorded_reads();
    assert_eq!(
        reads[0][0].query,
        Erc20Query::Allowance {
            owner: MOCK_OWNER,
            spender: DROP_CONTRACT_CYPRESS
        }
    );

    controller.submit_approval(TOKEN, "1").await?;
    assert_eq!(
        provider.recorded_writes(),
        vec![WriteRequest::erc20_approve(
            addr(TOKEN),
            DROP_CONTRACT_CYPRESS,
            wei(1)
        )]
    );
    Ok(())
}

#[tokio::test]
async fn nothing_is_dispatched_without_a_wallet() {
    let provider = MockProvider::disconnected();
    let controller = DropController::new(provider.clone());

    assert_eq!(
        controller.submit_approval(TOKEN, "50").await.unwrap_err(),
        WorkflowError::WalletNotConnected {}
    );
    assert_eq!(
        controller.refresh_token_info(TOKEN).await.unwrap_err(),
        WorkflowError::WalletNotConnected {}
    );
    assert!(provider.recorded_writes().is_empty());
    assert!(provider.recorded_reads().is_empty());
}
