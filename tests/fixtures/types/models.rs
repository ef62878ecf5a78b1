// Payload types for the integration fixture manifest
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
pub struct Req {
    /// Full name
    #[swagger(required)]
    pub name: String,
    #[swagger(required = true, comment = "Age in years")]
    pub age: i32,
    pub list: Vec<Item>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Item {
    pub java: String,
    pub golang: String,
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct User {
    #[swagger(required)]
    pub id: u64,
    #[serde(rename = "displayName")]
    pub name: String,
    #[serde(skip)]
    pub password_hash: String,
    pub profile: Option<Box<Profile>>,
    pub labels: HashMap<String, String>,
    pub scores: Vec<f64>,
    pub extra: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct Profile {
    pub bio: String,
    pub avatar: Option<String>,
}
