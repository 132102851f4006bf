//! One-shot flash messages carried across a redirect in a cookie
//!
//! A form handler answers with [`Flash::redirect`]; the next page reads the
//! message through the [`IncomingFlash`] extractor and expires the cookie.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue},
    response::{IntoResponse, Redirect, Response},
};
use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};
use std::convert::Infallible;

pub const FLASH_COOKIE: &str = "studio_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Success,
    Warning,
    Danger,
    Info,
}

impl FlashLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Warning => "warning",
            FlashLevel::Danger => "danger",
            FlashLevel::Info => "info",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "success" => Some(FlashLevel::Success),
            "warning" => Some(FlashLevel::Warning),
            "danger" => Some(FlashLevel::Danger),
            "info" => Some(FlashLevel::Info),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn new(level: FlashLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Warning, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Danger, message)
    }

    /// Cookie value: percent-encoded `{level}|{message}`
    pub fn encode(&self) -> String {
        let raw = format!("{}|{}", self.level.as_str(), self.message);
        utf8_percent_encode(&raw, NON_ALPHANUMERIC).to_string()
    }

    pub fn decode(value: &str) -> Option<Self> {
        let raw = percent_decode_str(value).decode_utf8().ok()?;
        let (level, message) = raw.split_once('|')?;
        Some(Self::new(FlashLevel::parse(level)?, message))
    }

    /// Read the flash cookie from request headers; malformed values are ignored
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|cookies| cookies.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == FLASH_COOKIE)
            .and_then(|(_, value)| Self::decode(value))
    }

    fn set_cookie(&self) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            FLASH_COOKIE,
            self.encode()
        )
    }

    /// 303 redirect carrying this message
    pub fn redirect(self, to: &str) -> Response {
        let mut response = Redirect::to(to).into_response();
        if let Ok(value) = HeaderValue::from_str(&self.set_cookie()) {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
        response
    }
}

/// `Set-Cookie` value that expires the flash cookie
pub fn clear_cookie() -> HeaderValue {
    HeaderValue::from_static("studio_flash=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
}

/// Extractor for the flash message of the current request, if any
#[derive(Debug, Clone, Default)]
pub struct IncomingFlash(pub Option<Flash>);

#[async_trait]
impl<S> FromRequestParts<S> for IncomingFlash
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(IncomingFlash(Flash::from_headers(&parts.headers)))
    }
}
