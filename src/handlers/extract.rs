use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::Validate;

use crate::error::ApiError;
use crate::filter::UpdateFields;

/// JSON body that must deserialize into `T` and pass its validation rules.
/// Every failure is a 400.
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// PATCH body: validated against `T`, then handed on as the fields the
/// client actually sent, in the order it sent them.
pub struct PartialJson<T>(pub UpdateFields, pub T);

#[async_trait]
impl<T, S> FromRequest<S> for PartialJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(map) = Json::<Map<String, Value>>::from_request(req, state).await?;
        let data: T =
            serde_json::from_value(Value::Object(map.clone())).map_err(|e| ApiError::invalid_json(e.to_string()))?;
        data.validate()?;
        Ok(Self(UpdateFields::from(map), data))
    }
}
