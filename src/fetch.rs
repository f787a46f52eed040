use reqwest::{Client, IntoUrl};
use serde::Deserialize;

use crate::error::LookupError;

/// Makes an HTTP GET request and deserializes the JSON response.
///
/// Single attempt: any failure is returned to the caller as-is.
pub async fn make_request<T, U>(client: &Client, url: U) -> Result<T, LookupError>
where
    T: for<'de> Deserialize<'de>,
    U: IntoUrl,
{
    let response = client.get(url).send().await.map_err(LookupError::Transport)?;

    if !response.status().is_success() {
        return Err(LookupError::Status(response.status()));
    }

    let data = response.json::<T>().await?;
    Ok(data)
}
