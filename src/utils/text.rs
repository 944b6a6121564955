/// 解碼 HTML 字元參照（&quot; &amp; &#x27; ...）
///
/// 文件頁面把程式碼範例嵌在 HTML 裡，先解碼才能做子字串搜尋。
pub fn decode_entities(raw: &str) -> String {
    html_escape::decode_html_entities(raw).into_owned()
}

/// 從 needle 第一次出現的位置開始，擷取最多 `window` 個字元
///
/// 視窗以字元計數，不是位元組。找不到 needle 就回傳 None。
pub fn excerpt(text: &str, needle: &str, window: usize) -> Option<String> {
    let start = text.find(needle)?;
    Some(text[start..].chars().take(window).collect())
}
