// @file: market_adapter/src/tests/user_wallet_tests.rs
// @description: Listen-key lifecycle, signed wallet requests and endpoint method dispatch.
// @author: LAS.

#[cfg(test)]
mod listen_key_and_wallet_tests {
    use crate::connectors::binance::binance_rest::sign_query;
    use crate::connectors::binance::endpoint::BinanceHttpEndpoint;
    use crate::connectors::binance::enums::{BinanceAccountType, BinanceMethodType, BinanceSecurityType};
    use crate::connectors::binance::user::BinanceUserDataHttpApi;
    use crate::connectors::binance::wallet::BinanceWalletHttpApi;
    use crate::core::error::AdapterError;
    use crate::tests::mock_server::{test_credentials, MockServer};
    use crate::utils::clock::TestClock;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use std::sync::Arc;

    //
    // USER DATA STREAM
    //

    #[tokio::test]
    async fn test_spot_listen_key_lifecycle() {
        let server = MockServer::fixed(200, r#"{"listenKey":"pqia91ma19a5s61cv6a81va65sdf19v8a65a1a5s61cv6a81va65sdf19v8a65a1"}"#).await;
        let api = BinanceUserDataHttpApi::new(server.client(Some(test_credentials())), BinanceAccountType::Spot);

        let key = api.create_listen_key(None).await.expect("create");
        api.keepalive_listen_key(None, &key.listen_key).await.expect("keepalive");
        api.delete_listen_key(None, &key.listen_key).await.expect("delete");

        let requests = server.requests().await;
        let methods: Vec<&str> = requests.iter().map(|r| r.method.as_str()).collect();
        assert_eq!(methods, vec!["POST", "PUT", "DELETE"]);
        assert!(requests.iter().all(|r| r.path == "/api/v3/userDataStream"));
        assert!(requests.iter().all(|r| r.header("X-MBX-APIKEY") == Some("test-key")));
        assert!(requests.iter().all(|r| r.param("signature").is_none()), "user stream is keyed, not signed");
        assert_eq!(requests[0].param("listenKey"), None);
        assert_eq!(requests[1].param("listenKey"), Some(key.listen_key.as_str()));
    }

    #[tokio::test]
    async fn test_isolated_margin_requires_symbol() {
        let server = MockServer::fixed(200, r#"{"listenKey":"abc"}"#).await;
        let api = BinanceUserDataHttpApi::new(server.client(Some(test_credentials())), BinanceAccountType::IsolatedMargin);

        assert!(matches!(api.create_listen_key(None).await, Err(AdapterError::InvalidParameters(_))));
        assert!(server.requests().await.is_empty());

        api.create_listen_key(Some("ethusdt")).await.expect("create");
        let requests = server.requests().await;
        assert_eq!(requests[0].path, "/sapi/v1/userDataStream/isolated");
        assert_eq!(requests[0].param("symbol"), Some("ETHUSDT"));
    }

    #[tokio::test]
    async fn test_futures_keepalive_omits_listen_key() {
        let server = MockServer::fixed(200, "{}").await;
        let api = BinanceUserDataHttpApi::new(server.client(Some(test_credentials())), BinanceAccountType::UsdtFuture);

        api.keepalive_listen_key(None, "ignored").await.expect("keepalive");

        let requests = server.requests().await;
        assert_eq!(requests[0].path, "/fapi/v1/listenKey");
        assert_eq!(requests[0].method, "PUT");
        assert_eq!(requests[0].param("listenKey"), None);
    }


    //
    // WALLET (SIGNED)
    //

    #[tokio::test]
    async fn test_trade_fee_request_is_signed() {
        let server = MockServer::fixed(200, r#"[{"symbol":"BTCUSDT","makerCommission":"0.001","takerCommission":"0.001"}]"#).await;
        let clock = Arc::new(TestClock::new(1_499_827_319_559_000_000));
        let api = BinanceWalletHttpApi::new(server.client_with_clock(Some(test_credentials()), clock));

        let fees = api.query_spot_trade_fees(Some("BTCUSDT")).await.expect("trade fees");

        assert_eq!(fees[0].maker_commission, Decimal::from_str("0.001").unwrap());
        let requests = server.requests().await;
        let request = &requests[0];
        assert_eq!(request.path, "/sapi/v1/asset/tradeFee");
        assert_eq!(request.header("X-MBX-APIKEY"), Some("test-key"));
        assert_eq!(request.param("symbol"), Some("BTCUSDT"));
        assert_eq!(request.param("timestamp"), Some("1499827319559"));

        let (unsigned, signature) = request
            .raw_query
            .split_once("&signature=")
            .expect("signature must be the last parameter");
        assert_eq!(signature, sign_query("test-secret", unsigned).unwrap());
    }

    #[tokio::test]
    async fn test_signed_request_without_credentials_fails_locally() {
        let server = MockServer::fixed(200, "[]").await;
        let api = BinanceWalletHttpApi::new(server.client(None));

        let result = api.query_spot_trade_fees(None).await;

        assert!(matches!(result, Err(AdapterError::MissingCredentials(_))));
        assert!(server.requests().await.is_empty());
    }


    //
    // ENDPOINT DISPATCH
    //

    #[tokio::test]
    async fn test_undeclared_method_is_rejected() {
        let server = MockServer::fixed(200, "{}").await;
        let endpoint = BinanceHttpEndpoint::new(
            server.client(None),
            &[(BinanceMethodType::Get, BinanceSecurityType::None)],
            "/api/v3/ping",
        );

        match endpoint.call(BinanceMethodType::Post, &()).await {
            Err(AdapterError::MethodNotAvailable { method, path }) => {
                assert_eq!(method, "POST");
                assert_eq!(path, "/api/v3/ping");
            }
            other => panic!("expected MethodNotAvailable, got {:?}", other),
        }
        assert!(server.requests().await.is_empty());

        endpoint.call(BinanceMethodType::Get, &()).await.expect("GET is declared");
        assert_eq!(server.requests().await.len(), 1);
    }
}
