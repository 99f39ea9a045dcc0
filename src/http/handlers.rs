//! Route handlers and their JSON views.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::blockchain::types::{Erc20Transfer, InternalCall, Transaction};
use crate::http::request::{parse_address, parse_hash, parse_hex_data};
use crate::http::response::ApiError;
use crate::http::server::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Serialize)]
pub struct BlockView {
    pub hash: String,
    pub height: String,
}

#[derive(Debug, Serialize)]
pub struct FeesView {
    pub gas_price: String,
}

#[derive(Debug, Serialize)]
pub struct BalanceView {
    pub balance: String,
}

#[derive(Debug, Serialize)]
pub struct NonceView {
    pub nonce: String,
}

#[derive(Debug, Serialize)]
pub struct EstimatedGasView {
    pub estimated_gas_limit: String,
}

#[derive(Debug, Serialize)]
pub struct BroadcastView {
    pub result: String,
}

#[derive(Debug, Serialize)]
pub struct HealthView {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct BlockRefView {
    pub height: Option<String>,
    pub hash: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TransferEventView {
    pub contract: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub count: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TransferEventsView {
    pub list: Vec<TransferEventView>,
}

#[derive(Debug, Serialize)]
pub struct ActionView {
    pub from: Option<String>,
    pub to: Option<String>,
    pub value: Option<String>,
    pub gas: Option<String>,
    pub gas_used: Option<String>,
}

/// Public shape of a transaction.
#[derive(Debug, Serialize)]
pub struct TransactionView {
    pub hash: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub input: Option<String>,
    pub value: Option<String>,
    pub confirmations: Option<u64>,
    pub gas_price: Option<String>,
    pub gas_used: Option<String>,
    pub gas_limit: Option<String>,
    pub nonce: Option<String>,
    pub status: Option<u8>,
    pub received_at: Option<String>,
    pub block: BlockRefView,
    pub transfer_events: TransferEventsView,
    pub actions: Vec<ActionView>,
}

impl From<Erc20Transfer> for TransferEventView {
    fn from(transfer: Erc20Transfer) -> Self {
        Self {
            contract: transfer.contract_address,
            from: transfer.from,
            to: transfer.to,
            count: transfer.value,
        }
    }
}

impl From<InternalCall> for ActionView {
    fn from(call: InternalCall) -> Self {
        Self {
            from: call.from,
            to: call.to,
            value: call.value,
            gas: call.gas_price,
            gas_used: call.gas_used,
        }
    }
}

impl From<Transaction> for TransactionView {
    fn from(tx: Transaction) -> Self {
        Self {
            hash: tx.hash,
            from: tx.from,
            to: tx.to,
            input: tx.input,
            value: tx.value,
            confirmations: tx.confirmations,
            gas_price: tx.gas_price,
            gas_used: tx.gas_used,
            gas_limit: tx.gas_limit,
            nonce: tx.nonce,
            status: tx.status,
            received_at: tx.received_at,
            block: BlockRefView {
                height: tx.block.number,
                hash: tx.block.hash,
            },
            transfer_events: TransferEventsView {
                list: tx.erc20_transfers.into_iter().map(Into::into).collect(),
            },
            actions: tx.internal_calls.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EstimateGasRequest {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub input: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub tx: String,
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

pub async fn health() -> Json<HealthView> {
    Json(HealthView {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn current_block(State(state): State<AppState>) -> ApiResult<BlockView> {
    let block = state.provider.get_current_block().await?;
    Ok(Json(BlockView {
        hash: block.hash,
        height: block.height,
    }))
}

pub async fn fees(State(state): State<AppState>) -> ApiResult<FeesView> {
    let gas_price = state.provider.get_gas_price().await?;
    Ok(Json(FeesView { gas_price }))
}

pub async fn transaction(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> ApiResult<TransactionView> {
    let hash = parse_hash(&hash)?;
    let tx = state.provider.get_transaction_by_hash(&hash).await?;
    Ok(Json(tx.into()))
}

pub async fn account_transactions(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> ApiResult<Vec<TransactionView>> {
    let address = parse_address(&address)?;
    let txs = state.provider.get_account_transactions(&address).await?;
    Ok(Json(txs.into_iter().map(Into::into).collect()))
}

pub async fn account_balance(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> ApiResult<BalanceView> {
    let address = parse_address(&address)?;
    let balance = state.provider.get_account_balance(&address).await?;
    Ok(Json(BalanceView { balance }))
}

pub async fn account_token_balance(
    State(state): State<AppState>,
    Path((address, contract)): Path<(String, String)>,
) -> ApiResult<BalanceView> {
    let address = parse_address(&address)?;
    let contract = parse_address(&contract)?;
    let balance = state
        .provider
        .get_account_token_balance(&address, &contract)
        .await?;
    Ok(Json(BalanceView { balance }))
}

pub async fn account_nonce(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> ApiResult<NonceView> {
    let address = parse_address(&address)?;
    let nonce = state.provider.get_account_nonce(&address).await?;
    Ok(Json(NonceView { nonce }))
}

pub async fn estimate_gas(
    State(state): State<AppState>,
    payload: Result<Json<EstimateGasRequest>, JsonRejection>,
) -> ApiResult<EstimatedGasView> {
    let request = body(payload)?;
    let from = parse_address(&request.from)?;
    let to = parse_address(&request.to)?;
    let input = parse_hex_data(request.input.as_deref().unwrap_or("0x"), "input")?;

    let estimated_gas_limit = state
        .provider
        .get_estimated_gas_limit(&from, &to, &input)
        .await?;
    Ok(Json(EstimatedGasView { estimated_gas_limit }))
}

pub async fn send_transaction(
    State(state): State<AppState>,
    payload: Result<Json<SendRequest>, JsonRejection>,
) -> ApiResult<BroadcastView> {
    let request = body(payload)?;
    let raw = parse_hex_data(&request.tx, "signed transaction")?;

    let result = state.provider.push_raw_transaction(&raw).await?;
    tracing::info!(hash = %result, "Transaction broadcast");
    Ok(Json(BroadcastView { result }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::types::BlockRef;
    use serde_json::json;

    #[test]
    fn test_transaction_view_shape() {
        let tx = Transaction {
            hash: "0xa".to_string(),
            value: Some("100".to_string()),
            gas_price: Some("1".to_string()),
            block: BlockRef {
                number: Some("10".to_string()),
                hash: Some("0xb10".to_string()),
            },
            confirmations: Some(5),
            status: Some(1),
            erc20_transfers: vec![Erc20Transfer {
                from: Some("0x1".to_string()),
                to: Some("0x2".to_string()),
                contract_address: Some("0xc".to_string()),
                value: Some("5".to_string()),
            }],
            internal_calls: vec![InternalCall {
                value: Some("7".to_string()),
                gas_price: Some("2300".to_string()),
                ..InternalCall::default()
            }],
            ..Transaction::default()
        };

        let view = serde_json::to_value(TransactionView::from(tx)).unwrap();
        assert_eq!(view["hash"], "0xa");
        assert_eq!(view["gas_price"], "1");
        assert_eq!(view["confirmations"], 5);
        assert_eq!(view["block"], json!({"height": "10", "hash": "0xb10"}));
        assert_eq!(
            view["transfer_events"]["list"][0],
            json!({"contract": "0xc", "from": "0x1", "to": "0x2", "count": "5"})
        );
        assert_eq!(view["actions"][0]["gas"], "2300");
        assert_eq!(view["actions"][0]["value"], "7");
    }
}
