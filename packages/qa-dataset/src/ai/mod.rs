//! Completer implementations backed by real model providers.

#[cfg(feature = "yandex")]
mod yandex;

#[cfg(feature = "yandex")]
pub use yandex::YandexGpt;
