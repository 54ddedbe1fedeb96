//! 数据库快照读取
//!
//! 浏览器运行时会一直持有 places.sqlite（某些配置下是排他锁）。
//! 这里采用“复制-读取”模式：
//! 1. 将数据库（以及 -wal / -shm 文件）复制到临时位置
//! 2. 在副本上打开连接并执行读取
//! 3. 无论成功、失败还是 panic，都关闭连接并删除副本
//!
//! 原始数据库永远不会被本进程打开或锁定。

use rusqlite::{Connection, OpenFlags};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Error, Result};

const SIDECARS: [&str; 2] = ["-wal", "-shm"];

/// `places.sqlite` + `-wal` -> `places.sqlite-wal`
fn sidecar_path(db_path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(db_path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Removes the temporary copy and anything SQLite left next to it.
struct SnapshotFiles {
    db_path: PathBuf,
}

impl Drop for SnapshotFiles {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.db_path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove snapshot {:?}: {}", self.db_path, e);
            }
        }
        for suffix in SIDECARS.iter().chain(std::iter::once(&"-journal")) {
            let path = sidecar_path(&self.db_path, suffix);
            if path.exists() {
                let _ = fs::remove_file(path);
            }
        }
        debug!("Removed snapshot {:?}", self.db_path);
    }
}

/// Copy `source` to the system temp directory, open it and run `body` on the
/// connection. The copy is removed before this returns.
pub fn with_snapshot<R, F>(source: &Path, body: F) -> Result<R>
where
    F: FnOnce(&Connection) -> Result<R>,
{
    with_snapshot_in(&std::env::temp_dir(), source, body)
}

/// Same as [`with_snapshot`] with an explicit directory for the copy.
pub fn with_snapshot_in<R, F>(temp_dir: &Path, source: &Path, body: F) -> Result<R>
where
    F: FnOnce(&Connection) -> Result<R>,
{
    let db_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "snapshot.sqlite".to_string());

    let files = SnapshotFiles {
        db_path: temp_dir.join(format!("{}_{}", uuid::Uuid::new_v4(), db_name)),
    };

    debug!("Copying {:?} to {:?}", source, files.db_path);
    fs::copy(source, &files.db_path).map_err(|e| Error::SnapshotIo {
        path: source.to_path_buf(),
        source: e,
    })?;

    // 还要复制 WAL 和 SHM 文件（如果存在），否则最近的修改不可见
    for suffix in SIDECARS {
        let from = sidecar_path(source, suffix);
        if from.exists() {
            if let Err(e) = fs::copy(&from, sidecar_path(&files.db_path, suffix)) {
                warn!("Failed to copy {:?}: {}", from, e);
            }
        }
    }

    let conn = Connection::open_with_flags(
        &files.db_path,
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|e| Error::SnapshotFormat {
        path: source.to_path_buf(),
        source: e,
    })?;

    // 打开是惰性的，读一次头部才能发现不是数据库的文件
    conn.query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))
        .map_err(|e| Error::SnapshotFormat {
            path: source.to_path_buf(),
            source: e,
        })?;

    let result = body(&conn);

    if let Err((_, e)) = conn.close() {
        warn!("Failed to close snapshot connection: {}", e);
    }

    result
}
