/// 转义 LIKE 模式中的通配符
///
/// `%` 与 `_` 在 LIKE 中有特殊含义，用户输入的搜索词需要先转义。
pub fn escape_like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\\' | '%' | '_' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}
