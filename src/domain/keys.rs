// ==========================================
// 设备台账系统 - 列名规范化
// ==========================================
// 用途: 待件标志列的模式识别（不区分大小写/变音符/分隔符）
// ==========================================

/// 列名规范化：折叠常见西语变音符，转小写，去掉分隔符
///
/// 规范化结果只用于与固定别名集合比对，从不写回文件。
pub fn normkey(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars().flat_map(char::to_lowercase) {
        let folded = match ch {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            ' ' | '_' | '-' | '.' | '/' => continue,
            other => other,
        };
        out.push(folded);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normkey_strips_separators_and_case() {
        assert_eq!(normkey("Esperando_Pieza"), "esperandopieza");
        assert_eq!(normkey("EN ESPERA"), "enespera");
        assert_eq!(normkey("Pieza.Espera"), "piezaespera");
    }

    #[test]
    fn test_normkey_folds_diacritics() {
        assert_eq!(normkey("Garantía"), "garantia");
        assert_eq!(normkey("Reparación"), "reparacion");
        assert_eq!(normkey("AÑO"), "ano");
    }
}
