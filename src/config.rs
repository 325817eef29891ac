use config::{Config as ConfigBuilder, Environment, File};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

/// 全局配置单例
static CONFIG: OnceCell<AppConfig> = OnceCell::new();

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3940,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别（RUST_LOG 未设置时生效）
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "rankboard=info,tower_http=info".to_string(),
        }
    }
}

/// API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API 路由前缀
    pub prefix: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            prefix: "/api/v1".to_string(),
        }
    }
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// 是否启用 CORS
    #[serde(default = "CorsConfig::default_enabled")]
    pub enabled: bool,
    /// 允许的 Origin 列表（支持 "*" 表示任意）
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    /// 允许的方法列表（支持 "*" 表示任意）
    #[serde(default)]
    pub allowed_methods: Vec<String>,
    /// 允许的请求头列表（支持 "*" 表示任意）
    #[serde(default)]
    pub allowed_headers: Vec<String>,
    /// 预检缓存时间（秒）
    #[serde(default)]
    pub max_age_secs: Option<u64>,
}

impl CorsConfig {
    fn default_enabled() -> bool {
        false
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            allowed_origins: Vec::new(),
            allowed_methods: Vec::new(),
            allowed_headers: Vec::new(),
            max_age_secs: None,
        }
    }
}

/// 图片渲染配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRenderConfig {
    /// 自定义字体目录（启动时加载其中的 ttf/otf）
    #[serde(default = "ImageRenderConfig::default_fonts_dir")]
    pub fonts_dir: String,
    /// 是否优先速度渲染（OptimizeSpeed），提升栅格化性能，可能略降画质
    #[serde(default)]
    pub optimize_speed: bool,
    /// 并发渲染许可数（0=自动，取 CPU 核心数）
    #[serde(default)]
    pub max_parallel: u32,
    /// 单个头像拉取超时（秒，0=不限制）
    #[serde(default = "ImageRenderConfig::default_avatar_timeout")]
    pub avatar_timeout_secs: u64,
    /// 头像并发拉取数（1=逐行顺序拉取）
    #[serde(default = "ImageRenderConfig::default_avatar_concurrency")]
    pub avatar_concurrency: usize,
    /// 单个头像最大字节数
    #[serde(default = "ImageRenderConfig::default_avatar_max_bytes")]
    pub avatar_max_bytes: usize,
    /// 单次请求参与者条数上限
    #[serde(default = "ImageRenderConfig::default_max_participants")]
    pub max_participants: usize,
}

impl ImageRenderConfig {
    fn default_fonts_dir() -> String {
        "resources/fonts".to_string()
    }
    fn default_avatar_timeout() -> u64 {
        10
    }
    fn default_avatar_concurrency() -> usize {
        1
    }
    fn default_avatar_max_bytes() -> usize {
        5 * 1024 * 1024
    }
    fn default_max_participants() -> usize {
        100
    }

    /// 头像拉取超时；0 表示不限制
    pub fn avatar_timeout(&self) -> Option<Duration> {
        (self.avatar_timeout_secs > 0).then(|| Duration::from_secs(self.avatar_timeout_secs))
    }

    /// 实际渲染并发许可数
    pub fn effective_max_parallel(&self) -> usize {
        if self.max_parallel == 0 {
            num_cpus::get()
        } else {
            self.max_parallel as usize
        }
    }
}

impl Default for ImageRenderConfig {
    fn default() -> Self {
        Self {
            fonts_dir: Self::default_fonts_dir(),
            optimize_speed: false,
            max_parallel: 0,
            avatar_timeout_secs: Self::default_avatar_timeout(),
            avatar_concurrency: Self::default_avatar_concurrency(),
            avatar_max_bytes: Self::default_avatar_max_bytes(),
            max_participants: Self::default_max_participants(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub api: ApiConfig,
    /// CORS 配置
    #[serde(default)]
    pub cors: CorsConfig,
    /// 图片渲染配置
    #[serde(default)]
    pub image: ImageRenderConfig,
}

impl AppConfig {
    /// 从配置文件加载配置，支持环境变量覆盖；配置文件缺失时全部使用默认值
    pub fn load() -> Result<Self, AppError> {
        let config_path = Self::get_config_path();

        tracing::info!("正在从 {:?} 加载配置文件", config_path);

        let builder = ConfigBuilder::builder()
            .add_source(File::from(config_path).required(false))
            // 支持环境变量覆盖，例如：APP_SERVER_PORT
            .add_source(
                Environment::with_prefix("APP")
                    .separator("_")
                    .try_parsing(true),
            )
            .build()?;

        let config = Self::from_config(builder)?;
        tracing::debug!(
            "配置加载完成: fonts_dir = {}, avatar_concurrency = {}",
            config.image.fonts_dir,
            config.image.avatar_concurrency
        );
        Ok(config)
    }

    /// 将已合并的配置源反序列化为 AppConfig
    pub fn from_config(source: ConfigBuilder) -> Result<Self, AppError> {
        Ok(source.try_deserialize()?)
    }

    /// 获取全局配置单例（未初始化时退回默认配置）
    pub fn global() -> &'static AppConfig {
        CONFIG.get_or_init(AppConfig::default)
    }

    /// 初始化全局配置
    pub fn init_global() -> Result<(), AppError> {
        let config = Self::load()?;
        CONFIG
            .set(config)
            .map_err(|_| AppError::Config("配置已经被初始化".to_string()))?;
        Ok(())
    }

    /// 获取配置文件路径
    fn get_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    /// 获取服务器监听地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 获取字体目录路径
    pub fn fonts_path(&self) -> PathBuf {
        PathBuf::from(&self.image.fonts_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ImageRenderConfig};
    use crate::error::AppError;

    fn toml_source(text: &str) -> config::Config {
        config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()
            .expect("build config source")
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_fields() {
        let cfg = AppConfig::from_config(toml_source("[image]\navatar_concurrency = 4\n"))
            .expect("deserialize");
        assert_eq!(cfg.image.avatar_concurrency, 4);
        assert_eq!(cfg.image.avatar_timeout_secs, 10);
        assert_eq!(cfg.server.port, 3940);
        assert_eq!(cfg.api.prefix, "/api/v1");
    }

    #[test]
    fn zero_timeout_disables_avatar_timeout() {
        let cfg = ImageRenderConfig {
            avatar_timeout_secs: 0,
            ..ImageRenderConfig::default()
        };
        assert!(cfg.avatar_timeout().is_none());
        assert!(ImageRenderConfig::default().effective_max_parallel() >= 1);
    }

    #[test]
    fn zero_max_parallel_uses_cpu_count() {
        let auto = ImageRenderConfig {
            max_parallel: 0,
            ..ImageRenderConfig::default()
        };
        assert_eq!(auto.effective_max_parallel(), num_cpus::get());
        let fixed = ImageRenderConfig {
            max_parallel: 3,
            ..ImageRenderConfig::default()
        };
        assert_eq!(fixed.effective_max_parallel(), 3);
    }

    #[test]
    fn mistyped_field_is_config_error() {
        let err = AppConfig::from_config(toml_source("[image]\navatar_concurrency = \"many\"\n"))
            .expect_err("type mismatch");
        assert!(matches!(err, AppError::Config(_)), "got {err:?}");
    }
}
