//! Holdings reconstruction through the public verifier API, against a
//! scripted chain.

mod common;

use chaingate_core::{BlockEnd, CoreError, ProfileOverride, TokenStandard};
use chaingate_verifier::{
    ChainGateError, ConfirmationPolicy, FailureMode, ReconstructOptions, VerificationRequest,
};
use common::*;
use ethers_core::abi::Token;
use ethers_core::types::Address;

fn erc721_request() -> VerificationRequest {
    VerificationRequest::for_address(wallet(), ERC721_CONTRACT, TokenStandard::SingleOwner)
}

fn erc1155_request() -> VerificationRequest {
    VerificationRequest::for_address(wallet(), ERC1155_CONTRACT, TokenStandard::MultiQuantity)
}

#[tokio::test]
async fn test_single_owner_keeps_only_held_ids() {
    let (mock, verifier) = verifier(
        MockChain::new()
            .with_logs(
                "Transfer",
                vec![transfer_log(10, wallet(), 5), transfer_log(20, wallet(), 9)],
            )
            .with_balance(wallet(), 5, 1)
            .with_balance(wallet(), 9, 0),
    );

    let holdings = verifier.holdings(&erc721_request()).await.unwrap();
    assert_eq!(holdings.to_vec(), ids(&[5]));
    assert_eq!(verifier.get_balance(&erc721_request()).await.unwrap(), 1);
    assert!(verifier.verify_ownership(&erc721_request()).await.unwrap());

    // one query and one call per event, per verification
    assert_eq!(mock.query_count(), 3);
    assert_eq!(mock.call_count(), 6);
}

#[tokio::test]
async fn test_single_owner_calls_balance_with_owner_and_id() {
    let (mock, verifier) = verifier(
        MockChain::new()
            .with_logs("Transfer", vec![transfer_log(10, wallet(), 42)])
            .with_balance(wallet(), 42, 1),
    );

    verifier.holdings(&erc721_request()).await.unwrap();

    let calls = mock.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "balanceOf");
    assert_eq!(
        calls[0].1,
        vec![Token::Address(wallet()), Token::Uint(42u64.into())]
    );
}

#[tokio::test]
async fn test_transferred_away_token_is_not_held() {
    // received at block 10, sent on later: the balance is what counts
    let (_, verifier) = verifier(
        MockChain::new().with_logs("Transfer", vec![transfer_log(10, wallet(), 7)]),
    );

    assert!(!verifier.verify_ownership(&erc721_request()).await.unwrap());
    assert_eq!(verifier.get_balance(&erc721_request()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_no_history_means_no_calls() {
    let (mock, verifier) = verifier(MockChain::new());

    let holdings = verifier.holdings(&erc721_request()).await.unwrap();
    assert!(holdings.is_empty());
    assert_eq!(mock.query_count(), 1);
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_multi_quantity_batch_keeps_positive_balances() {
    let (mock, verifier) = verifier(
        MockChain::new()
            .with_logs(
                "TransferBatch",
                vec![batch_log(10, wallet(), &[1, 2, 3], &[1, 0, 2])],
            )
            .with_balance(wallet(), 1, 1)
            .with_balance(wallet(), 3, 2),
    );

    let holdings = verifier.holdings(&erc1155_request()).await.unwrap();
    assert_eq!(holdings.to_vec(), ids(&[1, 3]));

    let calls = mock.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "balanceOfBatch");
    let Token::Array(accounts) = &calls[0].1[0] else {
        panic!("accounts argument is not an array");
    };
    assert_eq!(accounts, &vec![Token::Address(wallet()); 3]);
}

#[tokio::test]
async fn test_multi_quantity_merges_batch_and_single() {
    let (mock, verifier) = verifier(
        MockChain::new()
            .with_logs("TransferBatch", vec![batch_log(10, wallet(), &[1, 2], &[1, 1])])
            .with_logs(
                "TransferSingle",
                vec![single_log(11, wallet(), 2, 1), single_log(12, wallet(), 8, 3)],
            )
            .with_balance(wallet(), 1, 1)
            .with_balance(wallet(), 2, 4)
            .with_balance(wallet(), 8, 3),
    );

    let report = verifier.report(&erc1155_request()).await.unwrap();
    assert_eq!(report.holdings.to_vec(), ids(&[1, 2, 8]));
    assert_eq!(report.balance, 3);
    assert!(report.is_owner);
    assert_eq!(report.events_scanned, 3);
    assert_eq!(report.balance_calls, 3);

    // both event kinds were queried
    let events: Vec<String> = mock
        .queries
        .lock()
        .unwrap()
        .iter()
        .map(|q| q.event.clone())
        .collect();
    assert!(events.contains(&"TransferBatch".to_string()));
    assert!(events.contains(&"TransferSingle".to_string()));
}

#[tokio::test]
async fn test_once_per_token_skips_repeat_calls() {
    let logs = vec![
        transfer_log(10, wallet(), 4),
        transfer_log(11, wallet(), 4),
        transfer_log(12, wallet(), 7),
    ];

    let (every_mock, every) = verifier(
        MockChain::new()
            .with_logs("Transfer", logs.clone())
            .with_balance(wallet(), 4, 1),
    );
    let (once_mock, once) = verifier(
        MockChain::new()
            .with_logs("Transfer", logs)
            .with_balance(wallet(), 4, 1),
    );
    let once = once.with_options(ReconstructOptions {
        confirmation: ConfirmationPolicy::OncePerToken,
        ..Default::default()
    });

    let every_holdings = every.holdings(&erc721_request()).await.unwrap();
    let once_holdings = once.holdings(&erc721_request()).await.unwrap();

    assert_eq!(every_holdings, once_holdings);
    assert_eq!(every_mock.call_count(), 3);
    assert_eq!(once_mock.call_count(), 2);
}

#[tokio::test]
async fn test_event_without_id_is_skipped() {
    let broken = without_param(transfer_log(9, wallet(), 0), "tokenId");

    let (mock, verifier) = verifier(
        MockChain::new()
            .with_logs("Transfer", vec![broken, transfer_log(10, wallet(), 3)])
            .with_balance(wallet(), 3, 1),
    );

    let report = verifier.report(&erc721_request()).await.unwrap();
    assert_eq!(report.holdings.to_vec(), ids(&[3]));
    assert_eq!(report.events_scanned, 2);
    assert_eq!(report.events_skipped, 1);
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_multi_quantity_events_without_ids_are_skipped() {
    let (mock, verifier) = verifier(
        MockChain::new()
            .with_logs(
                "TransferBatch",
                vec![
                    without_param(batch_log(9, wallet(), &[4, 5], &[1, 1]), "ids"),
                    batch_log(10, wallet(), &[1, 2], &[1, 1]),
                ],
            )
            .with_logs(
                "TransferSingle",
                vec![
                    without_param(single_log(11, wallet(), 6, 1), "id"),
                    single_log(12, wallet(), 8, 2),
                ],
            )
            .with_balance(wallet(), 1, 1)
            .with_balance(wallet(), 4, 1)
            .with_balance(wallet(), 6, 1)
            .with_balance(wallet(), 8, 2),
    );

    let report = verifier.report(&erc1155_request()).await.unwrap();
    assert_eq!(report.holdings.to_vec(), ids(&[1, 8]));
    assert_eq!(report.events_scanned, 4);
    assert_eq!(report.events_skipped, 2);
    assert_eq!(report.balance_calls, 2);
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn test_batch_with_short_values_still_confirms_ids() {
    let (mock, verifier) = verifier(
        MockChain::new()
            .with_logs("TransferBatch", vec![batch_log(10, wallet(), &[1, 2, 3], &[1])])
            .with_balance(wallet(), 1, 1),
    );

    let report = verifier.report(&erc1155_request()).await.unwrap();
    assert_eq!(report.holdings.to_vec(), ids(&[1]));
    assert_eq!(report.events_skipped, 0);
    assert_eq!(report.balance_calls, 1);
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_failed_call_aborts_by_default() {
    let (_, verifier) = verifier(
        MockChain::new()
            .with_logs(
                "Transfer",
                vec![transfer_log(10, wallet(), 1), transfer_log(11, wallet(), 2)],
            )
            .with_balance(wallet(), 1, 1)
            .with_failing_id(2),
    );

    let err = verifier.holdings(&erc721_request()).await.unwrap_err();
    assert!(matches!(err, ChainGateError::ChainCall { .. }));
    assert!(err.is_chain_error());
}

#[tokio::test]
async fn test_partial_mode_keeps_going() {
    let (_, verifier) = verifier(
        MockChain::new()
            .with_logs(
                "Transfer",
                vec![transfer_log(10, wallet(), 1), transfer_log(11, wallet(), 2)],
            )
            .with_balance(wallet(), 1, 1)
            .with_failing_id(2),
    );
    let verifier = verifier.with_options(ReconstructOptions {
        failure_mode: FailureMode::Partial,
        ..Default::default()
    });

    let report = verifier.report(&erc721_request()).await.unwrap();
    assert_eq!(report.holdings.to_vec(), ids(&[1]));
    assert_eq!(report.events_skipped, 1);
}

#[tokio::test]
async fn test_query_failure_is_chain_query_error() {
    let (mock, verifier) = verifier(MockChain::new().with_failing_queries());

    let err = verifier.verify_ownership(&erc1155_request()).await.unwrap_err();
    assert!(matches!(err, ChainGateError::ChainQuery { .. }));
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_unregistered_contract_touches_no_chain() {
    let (mock, verifier) = verifier(MockChain::new());
    let request =
        VerificationRequest::for_address(wallet(), UNREGISTERED, TokenStandard::SingleOwner);

    let err = verifier.verify_ownership(&request).await.unwrap_err();
    assert!(matches!(err, ChainGateError::ContractNotRegistered(_)));
    assert_eq!(mock.chain_io_count(), 0);
}

#[tokio::test]
async fn test_contract_lookup_ignores_case() {
    let (_, verifier) = verifier(
        MockChain::new()
            .with_logs("Transfer", vec![transfer_log(10, wallet(), 5)])
            .with_balance(wallet(), 5, 1),
    );
    let request = VerificationRequest::for_address(
        wallet(),
        ERC721_CONTRACT.to_lowercase(),
        TokenStandard::SingleOwner,
    );

    assert!(verifier.verify_ownership(&request).await.unwrap());
}

#[tokio::test]
async fn test_overrides_reach_the_query() {
    let (mock, verifier) = verifier(MockChain::new());
    let request = erc721_request().with_profile(ProfileOverride {
        start_block: Some(17_000_000),
        end_block: Some(BlockEnd::Exact(18_000_000)),
        ..Default::default()
    });

    verifier.holdings(&request).await.unwrap();

    let queries = mock.queries.lock().unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].event, "Transfer");
    assert_eq!(queries[0].recipient_field, "to");
    assert_eq!(queries[0].recipient, wallet());
    assert_eq!(queries[0].range.start, 17_000_000);
    assert_eq!(queries[0].range.end, BlockEnd::Exact(18_000_000));
}

#[tokio::test]
async fn test_renamed_event_is_queried() {
    let (mock, verifier) = verifier(MockChain::new());
    let request = erc1155_request().with_profile(ProfileOverride {
        batch_transfer_event: Some("BatchMoved".to_string()),
        ..Default::default()
    });

    verifier.holdings(&request).await.unwrap();

    let events: Vec<String> = mock
        .queries
        .lock()
        .unwrap()
        .iter()
        .map(|q| q.event.clone())
        .collect();
    assert!(events.contains(&"BatchMoved".to_string()));
    assert!(events.contains(&"TransferSingle".to_string()));
}

#[tokio::test]
async fn test_invalid_profile_touches_no_chain() {
    let (mock, verifier) = verifier(MockChain::new());

    let blank = erc721_request().with_profile(ProfileOverride {
        transfer_event: Some(String::new()),
        ..Default::default()
    });
    let err = verifier.holdings(&blank).await.unwrap_err();
    assert!(matches!(
        err,
        ChainGateError::Core(CoreError::MissingProfileField { .. })
    ));

    let inverted = erc721_request().with_profile(ProfileOverride {
        start_block: Some(100),
        end_block: Some(BlockEnd::Exact(10)),
        ..Default::default()
    });
    let err = verifier.holdings(&inverted).await.unwrap_err();
    assert!(matches!(
        err,
        ChainGateError::Core(CoreError::InvalidBlockRange { .. })
    ));

    assert_eq!(mock.chain_io_count(), 0);
}

#[tokio::test]
async fn test_holdings_are_per_owner() {
    let other = Address::repeat_byte(0x77);
    let (_, verifier) = verifier(
        MockChain::new()
            .with_logs(
                "Transfer",
                vec![transfer_log(10, other, 1), transfer_log(11, wallet(), 2)],
            )
            .with_balance(other, 1, 1)
            .with_balance(wallet(), 2, 1),
    );

    let mine = verifier.holdings(&erc721_request()).await.unwrap();
    let theirs = verifier
        .holdings(&VerificationRequest::for_address(
            other,
            ERC721_CONTRACT,
            TokenStandard::SingleOwner,
        ))
        .await
        .unwrap();

    assert_eq!(mine.to_vec(), ids(&[2]));
    assert_eq!(theirs.to_vec(), ids(&[1]));
}

#[tokio::test]
async fn test_concurrent_requests_share_a_verifier() {
    let (mock, verifier) = verifier(
        MockChain::new()
            .with_logs("Transfer", vec![transfer_log(10, wallet(), 5)])
            .with_balance(wallet(), 5, 1),
    );

    let requests: Vec<_> = (0..8).map(|_| erc721_request()).collect();
    let answers = futures::future::join_all(
        requests.iter().map(|request| verifier.verify_ownership(request)),
    )
    .await;

    assert!(answers.into_iter().all(|answer| answer.unwrap()));
    assert_eq!(mock.query_count(), 8);
}
