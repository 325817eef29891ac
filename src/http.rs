use once_cell::sync::OnceCell;
use reqwest::Client;
use std::time::Duration;

/// 全局复用的 HTTP Client（统一连接池/Keep-Alive），避免每次渲染重复创建。
///
/// 说明：
/// - 超时由调用方按单次请求控制（见头像拉取），这里只设置连接超时。
/// - `Client` 本身是线程安全的，适合全局复用。
static CLIENT_DEFAULT: OnceCell<Client> = OnceCell::new();

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const USER_AGENT: &str = concat!("rankboard/", env!("CARGO_PKG_VERSION"));

/// 默认配置的 HTTP Client，用于拉取头像等外部图片。
pub fn client_default() -> Result<&'static Client, reqwest::Error> {
    CLIENT_DEFAULT.get_or_try_init(|| {
        Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
    })
}
