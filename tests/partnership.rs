mod common;

use axum::http::StatusCode;

use common::{envelope, with_header, Harness, SUPPORT_EMAIL};
use tubelab::api::AMOUNT;
use tubelab::service::partnership::RECEIPT_SUBJECT;
use tubelab::service::payment::WithdrawRequest;

#[tokio::test]
async fn settled_withdrawal_mails_a_receipt() {
    let harness = Harness::new().await;

    let response = with_header(harness.post("/partnership/withdrawMoney"), AMOUNT, "150").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(envelope(&response).is_ok());
    assert_eq!(
        harness.payment.requests(),
        [WithdrawRequest::new(150, harness.user.id.key())]
    );

    let sent = harness.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, harness.user.email);
    assert_eq!(sent[0].subject, RECEIPT_SUBJECT);
    assert!(sent[0].text.contains("Dear korone!"));
    assert!(sent[0].text.contains("150"));
    assert!(sent[0].text.contains(SUPPORT_EMAIL));
}

#[tokio::test]
async fn rejected_withdrawal_is_request_failed() {
    let harness = Harness::new().await;
    harness.payment.answer_with(StatusCode::BAD_REQUEST);

    let response = with_header(harness.post("/partnership/withdrawMoney"), AMOUNT, "150").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let status = envelope(&response).status;
    assert_eq!(status.name, "REQUEST_FAILED");
    assert!(status.message.contains("insufficient funds"));
    assert!(harness.mailer.sent().is_empty());
}

#[tokio::test]
async fn accepted_withdrawal_sends_no_receipt() {
    let harness = Harness::new().await;
    harness.payment.answer_with(StatusCode::ACCEPTED);

    let response = with_header(harness.post("/partnership/withdrawMoney"), AMOUNT, "20").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(harness.payment.requests().len(), 1);
    assert!(harness.mailer.sent().is_empty());
}

#[tokio::test]
async fn invalid_amount_never_reaches_the_payment_service() {
    let harness = Harness::new().await;

    for amount in ["0", "-3", "ten"] {
        let response = with_header(harness.post("/partnership/withdrawMoney"), AMOUNT, amount).await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(envelope(&response).status.name, "INVALID_HEADER");
    }

    let response = harness.post("/partnership/withdrawMoney").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    assert!(harness.payment.requests().is_empty());
}

#[tokio::test]
async fn unreachable_payment_service_is_request_failed() {
    let harness = Harness::with_unreachable_payment().await;

    let response = with_header(harness.post("/partnership/withdrawMoney"), AMOUNT, "5").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(envelope(&response).status.name, "REQUEST_FAILED");
    assert!(harness.mailer.sent().is_empty());
}

#[tokio::test]
async fn withdrawal_requires_a_session() {
    let harness = Harness::new().await;

    let response = with_header(harness.server.post("/partnership/withdrawMoney"), AMOUNT, "5").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert!(harness.payment.requests().is_empty());
}
