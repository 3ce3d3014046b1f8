//! 翻译工具
//!
//! 面向用户的提示通过 [`Translator`] 生成，宿主程序可以注入自己的实现

use std::collections::HashMap;

/// 翻译接口
pub trait Translator: Send + Sync {
    /// 按键翻译，`{0}`、`{1}` 等占位符依次替换为 `args`
    fn tr(&self, key: &str, args: &[&str]) -> String;
}

/// 内置语言
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    EnUs,
    ZhCn,
}

impl Language {
    /// 解析语言代码，无法识别时返回 None
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().replace('-', "_").as_str() {
            "en_us" => Some(Language::EnUs),
            "zh_cn" => Some(Language::ZhCn),
            _ => None,
        }
    }
}

const EN_US: &[(&str, &str)] = &[
    ("permission_manager.load.done", "Permission file loaded"),
    ("permission_manager.load.missing_key", "Option \"{0}\" missing, use default value"),
    ("permission_manager.set_default_permission_level.done", "Set default permission level to {0}"),
    ("permission_manager.set_permission_level.done", "The permission level of {0} has been set to {1}"),
];

const ZH_CN: &[(&str, &str)] = &[
    ("permission_manager.load.done", "权限文件已加载"),
    ("permission_manager.load.missing_key", "配置项\"{0}\"缺失，已使用默认值"),
    ("permission_manager.set_default_permission_level.done", "已将默认权限等级设置为{0}"),
    ("permission_manager.set_permission_level.done", "已将{0}的权限等级设置为{1}"),
];

/// 内置翻译表
#[derive(Debug, Clone)]
pub struct BuiltinTranslator {
    language: Language,
    table: HashMap<&'static str, &'static str>,
}

impl BuiltinTranslator {
    pub fn new(language: Language) -> Self {
        let entries = match language {
            Language::EnUs => EN_US,
            Language::ZhCn => ZH_CN,
        };
        Self {
            language,
            table: entries.iter().copied().collect(),
        }
    }

    /// 按语言代码创建，无法识别时回退到 en_us
    pub fn from_code(code: &str) -> Self {
        let language = Language::from_code(code).unwrap_or_else(|| {
            log::warn!("未知的语言 {}，使用 en_us", code);
            Language::EnUs
        });
        Self::new(language)
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

impl Default for BuiltinTranslator {
    fn default() -> Self {
        Self::new(Language::EnUs)
    }
}

impl Translator for BuiltinTranslator {
    fn tr(&self, key: &str, args: &[&str]) -> String {
        match self.table.get(key) {
            Some(template) => format_template(template, args),
            // 缺失的键原样返回
            None => key.to_string(),
        }
    }
}

/// 单次扫描替换 `{n}` 占位符，参数中的占位符不会被再次替换
fn format_template(template: &str, args: &[&str]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        result.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let arg = after.find('}').and_then(|end| {
            let index = after[..end].parse::<usize>().ok()?;
            args.get(index).map(|arg| (*arg, end))
        });
        match arg {
            Some((arg, end)) => {
                result.push_str(arg);
                rest = &after[end + 1..];
            }
            None => {
                result.push('{');
                rest = after;
            }
        }
    }
    result.push_str(rest);
    result
}
