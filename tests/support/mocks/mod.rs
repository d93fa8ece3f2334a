// tests/support/mocks/mod.rs
//! テストサポートモック再エクスポートモジュール
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod ports;
pub mod repos;
pub mod time;

/* -------------------------------- 再エクスポート -------------------------------- */

// 時刻関連
pub use time::{TickingClock, fixed_now};

// 外部ポート
pub use ports::{
    FailingEmbeddingGenerator, StaticAuthorDirectory, StaticTagResolver, StubEmbeddingGenerator,
    stub_embedding,
};

// リポジトリ関連
pub use repos::{DelayedReadRepo, FlakyVersionRepo};
