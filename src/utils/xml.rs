// XML编解码工具
// 固定结构记录与微信支付线上XML格式之间的转换

use quick_xml::{de, se};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{Result, WxPayError};

/// 线上报文的根元素名，与内存中的类型名无关
pub const ROOT_ELEMENT: &str = "xml";

/// 将记录序列化为线上XML
///
/// # Arguments
/// * `record` - 任意可序列化的固定结构记录
///
/// # Returns
/// * 以 `<xml>` 为根元素的XML字符串
pub fn to_xml<T: Serialize>(record: &T) -> Result<String> {
    se::to_string_with_root(ROOT_ELEMENT, record)
        .map_err(|e| WxPayError::Serialization(e.to_string()))
}

/// 将线上XML解析为固定结构记录
///
/// 根元素名不做校验，未知字段忽略。错误以文本返回，由调用方决定归类。
pub fn from_xml<T: DeserializeOwned>(bytes: &[u8]) -> std::result::Result<T, String> {
    let text = std::str::from_utf8(bytes).map_err(|e| format!("invalid UTF-8: {}", e))?;
    de::from_str(text).map_err(|e| e.to_string())
}

/// 生成 `<![CDATA[...]]>` 包裹的文本
pub fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"))
}
