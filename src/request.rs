use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RandomParam {
    pub count: Option<i64>,
}
