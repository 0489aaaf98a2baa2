#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use tempfile::TempDir;
use wiremock::{
    matchers::{body_partial_json, method},
    Mock, MockServer, ResponseTemplate,
};

pub const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
pub const OWNER: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

pub struct TestEnv {
    pub server: MockServer,
    pub home_dir: TempDir,
}

impl TestEnv {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
            home_dir: TempDir::new().unwrap(),
        }
    }

    pub fn chaingate(&self) -> Command {
        let mut cmd = Command::cargo_bin("chaingate").unwrap();
        let path = self.home_dir.path();
        cmd.env("HOME", path);
        cmd.env("USERPROFILE", path);
        cmd.env("APPDATA", path);
        cmd.env("LOCALAPPDATA", path);
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Answer one JSON-RPC method with a fixed result.
    pub async fn mock_rpc(&self, method_name: &str, result: serde_json::Value) {
        let response = ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": result
        }));

        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({ "method": method_name })))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    /// Write `~/.chaingate/config.toml` inside the isolated home.
    pub fn write_config(&self, contents: &str) {
        let dir = self.home_dir.path().join(".chaingate");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.toml"), contents).unwrap();
    }
}

/// An ERC-721 `Transfer` log minting `token_id` to [`OWNER`].
pub fn mint_log(token_id: u64) -> serde_json::Value {
    let word = |hex: &str| format!("0x{:0>64}", hex.trim_start_matches("0x").to_lowercase());
    serde_json::json!({
        "address": CONTRACT.to_lowercase(),
        "topics": [
            // keccak256("Transfer(address,address,uint256)")
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef",
            word("0x0"),
            word(OWNER),
            word(&format!("{:x}", token_id)),
        ],
        "data": "0x",
        "blockNumber": "0x10",
        "logIndex": "0x0"
    })
}

/// ABI-encoded uint256 return value.
pub fn uint_result(value: u64) -> serde_json::Value {
    serde_json::Value::String(format!("0x{:064x}", value))
}
