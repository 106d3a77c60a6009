//! Result page shown to the submitting browser

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use platform::text::escape_html;

pub const SUCCESS_MESSAGE: &str = "Form submitted successfully.";

/// Minimal self-contained page with one line of text
pub fn render_page(status: StatusCode, text: &str, base_url: &str) -> Response {
    let text = escape_html(text);
    let link = if base_url.is_empty() {
        String::new()
    } else {
        format!(
            "<p class=\"footer\">Powered by <a href=\"{0}\">{0}</a></p>",
            escape_html(base_url)
        )
    };

    let body = format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>Form submission</title>\n\
         <style>body{{font-family:sans-serif;display:flex;flex-direction:column;\
         align-items:center;justify-content:center;min-height:90vh;margin:0}}\
         .footer{{color:#888;font-size:.85em}}</style>\n\
         </head>\n\
         <body>\n\
         <h2>{text}</h2>\n\
         {link}\n\
         </body>\n\
         </html>\n"
    );

    (status, Html(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_escapes_text() {
        let response = render_page(StatusCode::OK, "<script>", "https://relay.example");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "text/html; charset=utf-8"
        );
    }
}
