const API_URL: &str = "HOSTWATCH_API_URL";

pub fn get_api_url() -> Option<String> {
    std::env::var(API_URL).ok().filter(|url| !url.is_empty())
}

const CSRF_TOKEN: &str = "HOSTWATCH_CSRF_TOKEN";

pub fn get_csrf_token() -> Option<String> {
    std::env::var(CSRF_TOKEN).ok().filter(|token| !token.is_empty())
}
