use axum::http::{HeaderValue, Method, header};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

use crate::config::CorsConfig;

/// 根据配置构建 CORS 中间件（未启用或配置无效时返回 None）
pub fn build_cors_layer(cors: &CorsConfig) -> Option<CorsLayer> {
    if !cors.enabled {
        return None;
    }

    let (any_origin, origins) = parse_list("allowed_origins", &cors.allowed_origins, |v| {
        HeaderValue::from_str(v).ok()
    });
    if !any_origin && origins.is_empty() {
        tracing::warn!("CORS 已启用但 allowed_origins 为空，已跳过启用");
        return None;
    }

    let (any_methods, methods) = parse_list("allowed_methods", &cors.allowed_methods, |v| {
        Method::from_bytes(v.to_ascii_uppercase().as_bytes()).ok()
    });
    let (any_headers, headers) = parse_list("allowed_headers", &cors.allowed_headers, |v| {
        header::HeaderName::from_bytes(v.to_ascii_lowercase().as_bytes()).ok()
    });

    let mut layer = CorsLayer::new();

    if any_origin {
        layer = layer.allow_origin(Any);
    } else {
        layer = layer.allow_origin(origins);
    }

    if any_methods {
        layer = layer.allow_methods(Any);
    } else if !methods.is_empty() {
        layer = layer.allow_methods(methods);
    }

    if any_headers {
        layer = layer.allow_headers(Any);
    } else if !headers.is_empty() {
        layer = layer.allow_headers(headers);
    }

    if let Some(secs) = cors.max_age_secs
        && secs > 0
    {
        layer = layer.max_age(Duration::from_secs(secs));
    }

    Some(layer)
}

/// 解析配置列表：`*` 表示任意，无效值记录告警后忽略
fn parse_list<T>(
    label: &str,
    values: &[String],
    parse: impl Fn(&str) -> Option<T>,
) -> (bool, Vec<T>) {
    let mut any = false;
    let mut out = Vec::new();
    for raw in values {
        let value = raw.trim();
        if value.is_empty() {
            continue;
        }
        if value == "*" {
            any = true;
            continue;
        }
        match parse(value) {
            Some(v) => out.push(v),
            None => tracing::warn!("CORS {} 含无效值: {}", label, value),
        }
    }
    (any, out)
}

#[cfg(test)]
mod tests {
    use super::{build_cors_layer, parse_list};
    use crate::config::CorsConfig;
    use axum::http::Method;

    #[test]
    fn build_cors_layer_skips_when_origins_empty() {
        let cors = CorsConfig {
            enabled: true,
            ..CorsConfig::default()
        };
        assert!(build_cors_layer(&cors).is_none());
    }

    #[test]
    fn build_cors_layer_disabled_by_default() {
        assert!(build_cors_layer(&CorsConfig::default()).is_none());
    }

    #[test]
    fn parse_list_normalizes_methods() {
        let input = vec!["get".to_string(), " POST ".to_string(), "*".to_string()];
        let (any, methods) = parse_list("allowed_methods", &input, |v| {
            Method::from_bytes(v.to_ascii_uppercase().as_bytes()).ok()
        });
        assert!(any);
        assert_eq!(methods, vec![Method::GET, Method::POST]);
    }
}
