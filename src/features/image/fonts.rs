use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock, RwLock};

use resvg::usvg::fontdb;

use crate::config::AppConfig;
use crate::error::AppError;

// 全局字体数据库：渲染时取快照（Arc 克隆），注册字体时写时复制
static GLOBAL_FONT_DB: OnceLock<RwLock<Arc<fontdb::Database>>> = OnceLock::new();

/// 初始化全局字体数据库：系统字体 + 配置目录下的自定义字体
fn init_global_font_db() -> RwLock<Arc<fontdb::Database>> {
    let mut font_db = fontdb::Database::new();
    font_db.load_system_fonts();

    let loaded = load_fonts_dir(&mut font_db, &AppConfig::global().fonts_path());
    tracing::info!(
        "字体数据库初始化完成：自定义字体 {} 个，共 {} 个字形",
        loaded,
        font_db.len()
    );

    RwLock::new(Arc::new(font_db))
}

/// 加载目录下的 ttf/otf，返回成功加载的文件数；目录不存在时返回 0
fn load_fonts_dir(font_db: &mut fontdb::Database, dir: &Path) -> usize {
    let Ok(entries) = fs::read_dir(dir) else {
        tracing::debug!("字体目录不存在或不可读: {}", dir.display());
        return 0;
    };
    let mut loaded = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file()
            && (path.extension() == Some("ttf".as_ref()) || path.extension() == Some("otf".as_ref()))
        {
            match font_db.load_font_file(&path) {
                Ok(()) => loaded += 1,
                Err(e) => tracing::error!("加载字体文件失败 '{}': {}", path.display(), e),
            }
        }
    }
    loaded
}

fn registry() -> &'static RwLock<Arc<fontdb::Database>> {
    GLOBAL_FONT_DB.get_or_init(init_global_font_db)
}

/// 获取当前字体数据库快照
pub fn get_global_font_db() -> Result<Arc<fontdb::Database>, AppError> {
    registry()
        .read()
        .map(|db| Arc::clone(&*db))
        .map_err(|_| AppError::Font("字体数据库锁已损坏".to_string()))
}

/// 从文件注册字体
pub fn register_font_file(path: impl AsRef<Path>) -> Result<Vec<String>, AppError> {
    let path = path.as_ref();
    let data = fs::read(path)
        .map_err(|e| AppError::Font(format!("读取字体文件失败 '{}': {e}", path.display())))?;
    register_font_data(data)
}

/// 注册字体数据，返回其中包含的字体族名。
///
/// 按字体族名幂等：若这些字体族已全部存在则不重复加载。
pub fn register_font_data(data: Vec<u8>) -> Result<Vec<String>, AppError> {
    let mut probe = fontdb::Database::new();
    probe.load_font_data(data.clone());
    let mut families: Vec<String> = probe
        .faces()
        .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
        .collect();
    families.dedup();
    if families.is_empty() {
        return Err(AppError::Font("无法识别的字体数据".to_string()));
    }

    let mut guard = registry()
        .write()
        .map_err(|_| AppError::Font("字体数据库锁已损坏".to_string()))?;
    let all_known = families.iter().all(|family| {
        guard
            .faces()
            .any(|face| face.families.iter().any(|(name, _)| name == family))
    });
    if all_known {
        tracing::debug!("字体族 {:?} 已注册，跳过", families);
        return Ok(families);
    }

    Arc::make_mut(&mut *guard).load_font_data(data);
    tracing::info!("已注册字体族 {:?}", families);
    Ok(families)
}

#[cfg(test)]
mod tests {
    use super::{load_fonts_dir, register_font_data};
    use resvg::usvg::fontdb;
    use std::path::Path;

    #[test]
    fn garbage_font_data_is_rejected() {
        assert!(register_font_data(b"definitely not a font".to_vec()).is_err());
    }

    #[test]
    fn missing_fonts_dir_loads_nothing() {
        let mut db = fontdb::Database::new();
        assert_eq!(load_fonts_dir(&mut db, Path::new("./no/such/fonts")), 0);
        assert_eq!(db.len(), 0);
    }
}
