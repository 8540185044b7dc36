//! Cookie jar shared with the reqwest client.
//!
//! The backend sets its credential cookies HTTP-only, so the client never
//! reads them; it only has to replay them. Cookie semantics (expiry, domain
//! and path matching, `Secure`) come from `cookie_store`; this module adds
//! the reqwest glue and mirrors the jar to a JSON file after every change.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use cookie_store::RawCookie;
use fs2::FileExt;
use reqwest::Url;
use reqwest::header::HeaderValue;
use tracing::{debug, trace, warn};
use uuid::Uuid;

use celebconnect_core::Result;
use celebconnect_core::error::StoreError;

fn encoding(err: impl std::fmt::Display) -> StoreError {
    StoreError::Encoding {
        message: err.to_string(),
    }
}

/// Thread-safe cookie store, optionally backed by a file.
///
/// Session cookies are persisted too: a CLI invocation is one "browser
/// session", and the next invocation must still present the credential.
#[derive(Debug, Default)]
pub struct CookieJar {
    store: Mutex<cookie_store::CookieStore>,
    file: Option<PathBuf>,
}

impl CookieJar {
    /// An empty jar that lives only in memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a jar from `path`, starting empty if the file does not exist.
    ///
    /// The jar writes itself back to `path` whenever the server changes it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let store = match File::open(&path) {
            Ok(file) if file.metadata().map(|m| m.len() == 0).unwrap_or(false) => {
                cookie_store::CookieStore::default()
            }
            Ok(file) => {
                cookie_store::serde::json::load_all(BufReader::new(file)).map_err(encoding)?
            }
            Err(err) if err.kind() == ErrorKind::NotFound => cookie_store::CookieStore::default(),
            Err(err) => return Err(StoreError::from(err).into()),
        };
        debug!(path = %path.display(), "loaded cookie jar");
        Ok(Self {
            store: Mutex::new(store),
            file: Some(path),
        })
    }

    /// Path the jar persists to, if any.
    pub fn path(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    fn locked(&self) -> MutexGuard<'_, cookie_store::CookieStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Value of the first unexpired cookie called `name`.
    pub fn value_of(&self, name: &str) -> Option<String> {
        self.locked()
            .iter_unexpired()
            .find(|c| c.name() == name)
            .map(|c| c.value().to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.locked().iter_unexpired().next().is_none()
    }

    /// Drop every cookie and persist the empty jar.
    pub fn clear(&self) -> Result<()> {
        self.locked().clear();
        self.save()
    }

    /// Write the jar to its file. A memory-only jar does nothing.
    ///
    /// Writers are serialized across processes by an advisory lock on a
    /// sibling `.lock` file; each write goes to a uniquely named temporary
    /// file that is renamed over the target.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.file else {
            return Ok(());
        };

        let mut content = Vec::new();
        cookie_store::serde::json::save_incl_expired_and_nonpersistent(
            &self.locked(),
            &mut content,
        )
        .map_err(encoding)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(StoreError::from)?;
        }
        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path.with_extension("lock"))
            .map_err(StoreError::from)?;
        lock_file.lock_exclusive().map_err(StoreError::from)?;

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("cookies.json");
        let temp_path =
            path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()));

        let written = create_private(&temp_path)
            .and_then(|file| {
                let mut writer = BufWriter::new(file);
                writer.write_all(&content)?;
                writer.into_inner().map_err(|e| e.into_error())?.sync_data()
            })
            .and_then(|()| fs::rename(&temp_path, path));
        let _ = lock_file.unlock();

        if let Err(err) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(StoreError::from(err).into());
        }
        Ok(())
    }
}

#[cfg(unix)]
fn create_private(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new()
        .create_new(true)
        .write(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn create_private(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create_new(true).write(true).open(path)
}

impl reqwest::cookie::CookieStore for CookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let cookies: Vec<RawCookie<'static>> = cookie_headers
            .filter_map(|value| value.to_str().ok())
            .filter_map(|s| RawCookie::parse(s.to_owned()).ok())
            .collect();
        if cookies.is_empty() {
            return;
        }
        trace!(count = cookies.len(), %url, "storing response cookies");
        self.locked().store_response_cookies(cookies.into_iter(), url);

        if let Err(err) = self.save() {
            warn!(error = %err, "could not persist cookie jar");
        }
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        let header = self
            .locked()
            .get_request_values(url)
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ");
        if header.is_empty() {
            None
        } else {
            HeaderValue::from_str(&header).ok()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::cookie::CookieStore;
    use tempfile::TempDir;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn set(jar: &CookieJar, headers: &[&str], at: &str) {
        let values: Vec<HeaderValue> = headers
            .iter()
            .map(|h| HeaderValue::from_str(h).unwrap())
            .collect();
        jar.set_cookies(&mut values.iter(), &url(at));
    }

    fn sent(jar: &CookieJar, at: &str) -> Vec<String> {
        let mut pairs: Vec<String> = jar
            .cookies(&url(at))
            .map(|h| h.to_str().unwrap().split("; ").map(str::to_string).collect())
            .unwrap_or_default();
        pairs.sort();
        pairs
    }

    #[test]
    fn replays_cookies_for_same_host() {
        let jar = CookieJar::new();
        set(
            &jar,
            &["access=abc; Path=/; HttpOnly; Secure", "refresh=xyz; HttpOnly"],
            "https://api.celebconnect.test/auth/login",
        );

        assert_eq!(
            sent(&jar, "https://api.celebconnect.test/user/bookings"),
            vec!["access=abc", "refresh=xyz"]
        );
        assert!(jar.cookies(&url("https://other.test/")).is_none());
    }

    #[test]
    fn newer_value_replaces_older() {
        let jar = CookieJar::new();
        set(&jar, &["access=one; Path=/"], "https://api.celebconnect.test/");
        set(&jar, &["access=two; Path=/"], "https://api.celebconnect.test/refresh");

        assert_eq!(jar.value_of("access").as_deref(), Some("two"));
        assert_eq!(sent(&jar, "https://api.celebconnect.test/"), vec!["access=two"]);
    }

    #[test]
    fn max_age_zero_deletes() {
        let jar = CookieJar::new();
        set(&jar, &["access=abc; Path=/"], "https://api.celebconnect.test/");
        set(
            &jar,
            &["access=; Max-Age=0; Path=/"],
            "https://api.celebconnect.test/auth/logout",
        );
        assert!(jar.is_empty());
    }

    #[test]
    fn past_expires_deletes() {
        let jar = CookieJar::new();
        set(&jar, &["access=live; Path=/"], "https://api.celebconnect.test/");
        set(
            &jar,
            &["access=stale; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT"],
            "https://api.celebconnect.test/",
        );

        assert_eq!(jar.value_of("access"), None);
        assert!(jar.cookies(&url("https://api.celebconnect.test/")).is_none());
    }

    #[test]
    fn domain_cookie_reaches_subdomains() {
        let jar = CookieJar::new();
        set(
            &jar,
            &["session=s1; Domain=.celebconnect.test"],
            "https://api.celebconnect.test/",
        );
        assert!(jar.cookies(&url("https://cdn.celebconnect.test/x")).is_some());
        assert!(jar.cookies(&url("https://evilcelebconnect.test/")).is_none());
    }

    #[test]
    fn foreign_domain_is_rejected() {
        let jar = CookieJar::new();
        set(&jar, &["sid=x; Domain=victim.test"], "https://api.celebconnect.test/");

        assert!(jar.cookies(&url("https://victim.test/")).is_none());
        assert!(jar.is_empty());
    }

    #[test]
    fn secure_cookie_is_not_sent_over_plain_http() {
        let jar = CookieJar::new();
        set(&jar, &["access=abc; Secure; Path=/"], "https://api.celebconnect.test/");

        assert!(jar.cookies(&url("http://api.celebconnect.test/")).is_none());
        assert!(jar.cookies(&url("https://api.celebconnect.test/")).is_some());
    }

    #[test]
    fn path_scoping_is_segment_aware() {
        let jar = CookieJar::new();
        set(&jar, &["admin=a; Path=/admin"], "https://api.celebconnect.test/admin");
        assert!(jar.cookies(&url("https://api.celebconnect.test/admin/users")).is_some());
        assert!(jar.cookies(&url("https://api.celebconnect.test/administer")).is_none());
    }

    #[test]
    fn session_cookies_persist_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cookies.json");

        let jar = CookieJar::load(&path).unwrap();
        assert!(jar.is_empty());
        set(&jar, &["access=abc; Path=/"], "https://api.celebconnect.test/");

        let reloaded = CookieJar::load(&path).unwrap();
        assert_eq!(reloaded.value_of("access").as_deref(), Some("abc"));

        reloaded.clear().unwrap();
        assert!(CookieJar::load(&path).unwrap().is_empty());
    }

    #[test]
    fn concurrent_saves_leave_a_readable_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cookies.json");

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let path = path.clone();
                std::thread::spawn(move || {
                    // Separate jars stand in for separate processes.
                    let jar = CookieJar::load(&path).unwrap();
                    let header = format!("access=v{}; Path=/", i);
                    set(&jar, &[header.as_str()], "https://api.celebconnect.test/");
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let reloaded = CookieJar::load(&path).unwrap();
        assert!(reloaded.value_of("access").unwrap().starts_with('v'));
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn jar_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cookies.json");
        let jar = CookieJar::load(&path).unwrap();
        set(&jar, &["access=abc"], "https://api.celebconnect.test/");

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
