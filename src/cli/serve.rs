use anyhow::Result;

use super::flag_value;
use crate::core::context::AppContext;
use crate::core::terminal::print_step;
use crate::interfaces::web::ApiServer;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 17910;

pub(crate) fn parse_serve_args(args: &[String]) -> (String, u16) {
    let host = flag_value(args, "--api-host")
        .unwrap_or(DEFAULT_HOST)
        .to_string();
    let port = flag_value(args, "--api-port")
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    (host, port)
}

pub async fn run(ctx: &AppContext, args: &[String]) -> Result<()> {
    let (host, port) = parse_serve_args(args);
    print_step(&format!("Starting API server on http://{}:{}", host, port));
    ApiServer::new(ctx, host, port).serve().await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_apply_without_flags() {
        assert_eq!(
            parse_serve_args(&argv(&[])),
            ("127.0.0.1".to_string(), 17910)
        );
    }

    #[test]
    fn flags_override_defaults() {
        let (host, port) =
            parse_serve_args(&argv(&["--api-host", "0.0.0.0", "--api-port", "8080"]));
        assert_eq!(host, "0.0.0.0");
        assert_eq!(port, 8080);
    }

    #[test]
    fn bad_port_falls_back_to_default() {
        let (_, port) = parse_serve_args(&argv(&["--api-port", "not-a-port"]));
        assert_eq!(port, 17910);
    }
}
