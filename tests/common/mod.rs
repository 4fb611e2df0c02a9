use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Header plus three customers, one of them defaulted
#[allow(dead_code)]
pub const SAMPLE_CSV: &str = "CUST_ID,INCOME,SAVINGS,DEBT,CREDIT_SCORE,DEFAULT\n\
C03PVPPHOY,45000,1200,30000,600,0\n\
C02COQEVYU,90000,25000,10000,700,1\n\
C0AB12CDEF,60000,8000,5000,800,0\n";

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

#[allow(dead_code)]
pub fn temp_dataset_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let dataset_path = temp_dir.path().join("credit_score.csv");
    fs::write(&dataset_path, contents).expect("failed to write dataset file");
    (temp_dir, dataset_path)
}

/// A successful chat completion body carrying `content`
#[allow(dead_code)]
pub fn completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 120, "completion_tokens": 12, "total_tokens": 132 }
    })
}
