use serde::Serialize;

/// An Alpha Vantage query, selected by its `function` parameter.
pub trait Method {
    const FUNCTION: &'static str;

    type Response: serde::de::DeserializeOwned;
    type Params: Serialize;
}
