use super::*;
use crate::{
    cookie::SecurityToken,
    test_support::{settings_for, unreachable_url, RecordingHost, RecordingSink, StubStorefront},
};
use axum::http::StatusCode;
use serde_json::json;
use shared::{error::ErrorKind, protocol::OrderLine};

const PROCESS_ORDER_PATH: &str = "/checkout/process_order/";

fn complete_form() -> CheckoutForm {
    CheckoutForm {
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        email: "ada@example.com".into(),
        address: "12 Analytical Row".into(),
        city: Some("Bengaluru".into()),
        state: "KA".into(),
        zip: "560001".into(),
    }
}

fn sample_lines() -> Vec<OrderLine> {
    vec![
        OrderLine {
            name: "Nike Air VaporMax".into(),
            quantity: 1,
            price: 85.0,
        },
        OrderLine {
            name: "Nike ZoomX Vaporfly".into(),
            quantity: 1,
            price: 125.0,
        },
    ]
}

fn checkout_client(
    base_url: &str,
    session: SessionContext,
) -> (CheckoutClient, Arc<RecordingHost>, Arc<RecordingSink>) {
    let host = Arc::new(RecordingHost::default());
    let sink = Arc::new(RecordingSink::default());
    let client = CheckoutClient::with_error_sink(
        &settings_for(base_url),
        session,
        host.clone(),
        sink.clone(),
    )
    .expect("client");
    (client, host, sink)
}

fn authenticated() -> SessionContext {
    SessionContext::authenticated("ada@example.com", Some(SecurityToken::new("tok-9")))
}

#[test]
fn complete_form_moves_on_to_shipping() {
    assert_eq!(
        validate_checkout_form(&complete_form()),
        Ok(CheckoutStep::Shipping)
    );
}

#[test]
fn blank_fields_are_reported_in_form_order() {
    let form = CheckoutForm {
        first_name: "   ".into(),
        email: String::new(),
        zip: "\t".into(),
        state: String::new(),
        ..complete_form()
    };

    assert_eq!(
        validate_checkout_form(&form),
        Err(CheckoutError::MissingFields(vec![
            "first_name",
            "email",
            "state",
            "zip"
        ]))
    );
}

#[test]
fn city_is_optional() {
    let form = CheckoutForm {
        city: None,
        ..complete_form()
    };
    assert!(validate_checkout_form(&form).is_ok());
}

#[test]
fn shipping_selection_requires_a_checked_option() {
    let mut options = vec![
        ShippingOption {
            value: "standard".into(),
            checked: false,
        },
        ShippingOption {
            value: "express".into(),
            checked: false,
        },
    ];
    assert_eq!(
        validate_shipping_selection(&options),
        Err(CheckoutError::NoShippingMethod)
    );

    options[1].checked = true;
    let selected = validate_shipping_selection(&options).expect("selected");
    assert_eq!(selected.value, "express");
}

#[test]
fn flow_navigates_or_alerts() {
    let host = Arc::new(RecordingHost::default());
    let flow = CheckoutFlow::new(host.clone());

    assert!(!flow.proceed_to_shipping(&CheckoutForm::default()));
    assert!(flow.proceed_to_shipping(&complete_form()));
    assert!(!flow.proceed_to_payment(&[]));
    assert!(flow.proceed_to_payment(&[ShippingOption {
        value: "standard".into(),
        checked: true,
    }]));

    assert_eq!(
        host.navigations(),
        vec!["/checkout/shipping/", "/checkout/payment/"]
    );
    assert_eq!(
        host.alerts(),
        vec![
            "Please fill in all required fields before proceeding.",
            "Please select a shipping method before proceeding.",
        ]
    );
}

#[tokio::test]
async fn process_order_posts_snapshot_with_token() {
    let (server_url, captured) = StubStorefront::replying(
        StatusCode::OK,
        r#"{"success": true, "order_number": "WB-0042"}"#,
    )
    .spawn(PROCESS_ORDER_PATH)
    .await;
    let (client, _host, _sink) = checkout_client(&server_url, authenticated());
    let snapshot = OrderSnapshot::from_form(&complete_form(), sample_lines());

    let response = client.process_order(&snapshot).await.expect("order");
    assert_eq!(response.order_number.as_deref(), Some("WB-0042"));

    let requests = captured.lock().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].csrf_token.as_deref(), Some("tok-9"));
    assert_eq!(
        requests[0].body,
        json!({
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "address": "12 Analytical Row",
            "city": "Bengaluru",
            "state": "KA",
            "zip": "560001",
            "items": [
                {"name": "Nike Air VaporMax", "quantity": 1, "price": 85.0},
                {"name": "Nike ZoomX Vaporfly", "quantity": 1, "price": 125.0}
            ]
        })
    );
}

#[tokio::test]
async fn success_is_decided_by_status_not_message_field() {
    let (server_url, _captured) = StubStorefront::replying(StatusCode::OK, r#"{"success": true}"#)
        .spawn(PROCESS_ORDER_PATH)
        .await;
    let (client, host, sink) = checkout_client(&server_url, authenticated());
    let snapshot = OrderSnapshot::from_form(&complete_form(), sample_lines());

    assert!(client.place_order_and_redirect(&snapshot).await);
    assert_eq!(host.navigations(), vec!["/checkout/shipping/"]);
    assert!(host.alerts().is_empty());
    assert!(sink.kinds().is_empty());
}

#[tokio::test]
async fn rejected_order_alerts_and_reports() {
    let (server_url, _captured) = StubStorefront::replying(
        StatusCode::BAD_REQUEST,
        r#"{"error": "Cannot place order with total 0", "message": "ignored"}"#,
    )
    .spawn(PROCESS_ORDER_PATH)
    .await;
    let (client, host, sink) = checkout_client(&server_url, authenticated());
    let snapshot = OrderSnapshot::from_form(&complete_form(), Vec::new());

    assert!(!client.place_order_and_redirect(&snapshot).await);
    assert!(host.navigations().is_empty());
    assert_eq!(host.alerts(), vec!["Error placing order. Please try again."]);
    assert_eq!(sink.kinds(), vec![ErrorKind::Application]);
}

#[tokio::test]
async fn success_status_with_non_json_body_fails_the_order() {
    let (server_url, _captured) = StubStorefront::replying(StatusCode::OK, "<html>thanks</html>")
        .spawn(PROCESS_ORDER_PATH)
        .await;
    let (client, host, sink) = checkout_client(&server_url, authenticated());
    let snapshot = OrderSnapshot::from_form(&complete_form(), sample_lines());

    assert!(!client.place_order_and_redirect(&snapshot).await);
    assert!(host.navigations().is_empty());
    assert_eq!(host.alerts(), vec!["Error placing order. Please try again."]);
    assert_eq!(sink.kinds(), vec![ErrorKind::Decode]);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_failure() {
    let server_url = unreachable_url().await;
    let (client, host, sink) = checkout_client(&server_url, authenticated());
    let snapshot = OrderSnapshot::from_form(&complete_form(), sample_lines());

    assert!(!client.place_order_and_redirect(&snapshot).await);
    assert!(host.navigations().is_empty());
    assert_eq!(sink.kinds(), vec![ErrorKind::Transport]);
}

#[tokio::test]
async fn anonymous_session_cannot_place_orders() {
    let (server_url, captured) = StubStorefront::replying(StatusCode::OK, "{}")
        .spawn(PROCESS_ORDER_PATH)
        .await;
    let (client, _host, _sink) = checkout_client(&server_url, SessionContext::anonymous());
    let snapshot = OrderSnapshot::from_form(&complete_form(), sample_lines());

    let err = client.process_order(&snapshot).await.expect_err("anonymous");
    assert!(matches!(err, ClientError::Anonymous));
    assert!(captured.lock().await.is_empty());
}
