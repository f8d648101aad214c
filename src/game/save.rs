//! Incremental Adventure セーブ/ロード機能。
//!
//! セーブデータは `GameState` をそのまま JSON にしたもの
//! (`resources` / `upgrades` / `story` / `prestige`)。バージョン番号は持たない。
//!
//! 保存先は `KeyValueStore` で差し替える:
//! - wasm32: `localStorage` (`LocalStorage`)
//! - ネイティブ: ディレクトリ内の JSON ファイル (`FileStore`)
//! - テスト/組み込み: `MemoryStore`
//!
//! 読み込みに失敗した場合（パースエラー、不変条件違反）はエラーを表に出さず
//! `None` を返し、呼び出し側は初期状態で始める。

use std::collections::HashMap;

use super::state::{GameState, InvalidState};
use super::story::chapter_count;

/// セーブ処理で起こりうるエラー。
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("storage backend unavailable")]
    Unavailable,
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("failed to (de)serialize save data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("save data violates game invariants: {0}")]
    Invalid(#[from] InvalidState),
    #[error("file storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// 文字列キー/値の永続ストア。
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;
    fn remove(&mut self, key: &str) -> Result<(), PersistenceError>;
}

/// メモリ上のストア。プロセス終了で消える。
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// キーごとに `<dir>/<key>.json` を書くストア。
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(dir: impl Into<std::path::PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> std::path::PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        std::fs::create_dir_all(&self.dir)?;
        // 途中で落ちても壊れたファイルが残らないよう一時ファイル経由で置き換える
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, self.path(key))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        match std::fs::remove_file(self.path(key)) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// ブラウザの localStorage。WASM 環境でのみ動作。
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, PersistenceError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(PersistenceError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| PersistenceError::Backend(format!("{e:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| PersistenceError::Backend(format!("{e:?}")))
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| PersistenceError::Backend(format!("{e:?}")))
    }
}

/// ゲーム状態を JSON 文字列にする。
pub fn encode(state: &GameState) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(state)?)
}

/// JSON 文字列からゲーム状態を復元し、不変条件を検証する。
pub fn decode(json: &str) -> Result<GameState, PersistenceError> {
    let state: GameState = serde_json::from_str(json)?;
    state.validate(chapter_count())?;
    Ok(state)
}

/// 1つのキーにゲーム状態を読み書きするアダプタ。
#[derive(Debug)]
pub struct Persistence<S> {
    backend: S,
    key: String,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(backend: S, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// 保存済みのゲーム状態を読み込む。
    /// データが無い、壊れている、不変条件を満たさない場合は None（新規ゲームになる）。
    pub fn load(&mut self) -> Option<GameState> {
        let json = match self.backend.get(&self.key) {
            Ok(Some(j)) => j,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("save store unreadable, starting fresh: {e}");
                return None;
            }
        };

        match decode(&json) {
            Ok(state) => Some(state),
            Err(e) => {
                log::warn!("discarding corrupt save `{}`: {e}", self.key);
                // 壊れたデータを削除
                if let Err(e) = self.backend.remove(&self.key) {
                    log::warn!("failed to remove corrupt save: {e}");
                }
                None
            }
        }
    }

    /// ゲーム状態を保存する。
    /// 失敗時はログに残すだけで呼び出し側には伝えない（tick/操作を止めない）。
    pub fn save(&mut self, state: &GameState) {
        if let Err(e) = self.try_save(state) {
            log::warn!("failed to save game: {e}");
        }
    }

    fn try_save(&mut self, state: &GameState) -> Result<(), PersistenceError> {
        let json = encode(state)?;
        self.backend.set(&self.key, &json)
    }

    /// セーブデータを削除する。
    pub fn clear(&mut self) {
        if let Err(e) = self.backend.remove(&self.key) {
            log::warn!("failed to delete save: {e}");
        }
    }
}
