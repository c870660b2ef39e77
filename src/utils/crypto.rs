// 签名工具函数
// 提供统一下单请求与支付通知共用的规范化签名、验签以及随机串生成

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use rand::{distributions::Alphanumeric, Rng};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::{Result, WxPayError};

type HmacSha256 = Hmac<Sha256>;

/// 携带签名本身的字段名，永远不参与签名计算
pub const SIGN_FIELD: &str = "sign";

/// 随机字符串的默认长度 (微信要求不超过32位)
pub const NONCE_LENGTH: usize = 32;

/// 可签名记录中的单个标量值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Str(&'a str),
    Int(i64),
}

impl FieldValue<'_> {
    /// 渲染为参与签名的规范字符串形式
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Str(s) => Cow::Borrowed(*s),
            FieldValue::Int(n) => Cow::Owned(n.to_string()),
        }
    }
}

/// 可签名记录
///
/// 每种记录类型按线上字段的声明顺序给出一份静态的 (线上字段名, 值) 列表，
/// 签名器只依赖这份列表，不关心具体类型。
pub trait SignableRecord {
    /// 全部线上字段，按声明顺序
    fn fields(&self) -> Vec<(&str, FieldValue<'_>)>;

    /// 记录自身携带的签名
    fn signature(&self) -> &str;
}

/// 任意键值参数，用于签名非固定结构的参数集合
impl SignableRecord for BTreeMap<String, String> {
    fn fields(&self) -> Vec<(&str, FieldValue<'_>)> {
        self.iter()
            .map(|(k, v)| (k.as_str(), FieldValue::Str(v.as_str())))
            .collect()
    }

    fn signature(&self) -> &str {
        self.get(SIGN_FIELD).map(String::as_str).unwrap_or("")
    }
}

/// 签名算法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignType {
    #[default]
    Md5,
    HmacSha256,
}

impl SignType {
    /// 线上名称
    pub fn as_str(&self) -> &'static str {
        match self {
            SignType::Md5 => "MD5",
            SignType::HmacSha256 => "HMAC-SHA256",
        }
    }
}

impl fmt::Display for SignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignType {
    type Err = WxPayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MD5" | "" => Ok(SignType::Md5),
            "HMAC-SHA256" => Ok(SignType::HmacSha256),
            other => Err(WxPayError::InvalidInput(format!(
                "Unsupported sign type: {}",
                other
            ))),
        }
    }
}

/// 生成待签名字符串
///
/// 规则:
/// 1. 排除 `sign` 字段
/// 2. 按字段名字节序升序排列
/// 3. 值为空串或字面量 "0" 的字段整体跳过
/// 4. 拼接为 `k=v&`，最后追加 `key=<API密钥>`
///
/// # Arguments
/// * `record` - 可签名记录
/// * `api_key` - 商户API密钥
///
/// # Returns
/// * 待签名字符串 (包含密钥，不得记录日志)
pub fn canonical_string<R: SignableRecord + ?Sized>(record: &R, api_key: &str) -> Result<String> {
    if api_key.is_empty() {
        return Err(WxPayError::InvalidInput("API key cannot be empty".to_string()));
    }

    let mut fields: Vec<_> = record
        .fields()
        .into_iter()
        .filter(|(key, _)| *key != SIGN_FIELD)
        .collect();
    fields.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    let mut s = String::new();
    for (key, value) in &fields {
        let rendered = value.render();
        // 整型字段默认值为0，不能进入签名串
        if rendered.is_empty() || rendered == "0" {
            continue;
        }
        s.push_str(key);
        s.push('=');
        s.push_str(&rendered);
        s.push('&');
    }
    s.push_str("key=");
    s.push_str(api_key);

    Ok(s)
}

/// 使用MD5计算签名
///
/// # Arguments
/// * `record` - 可签名记录
/// * `api_key` - 商户API密钥
///
/// # Returns
/// * 32位大写十六进制签名
pub fn sign<R: SignableRecord + ?Sized>(record: &R, api_key: &str) -> Result<String> {
    sign_with(record, api_key, SignType::Md5)
}

/// 使用指定算法计算签名
///
/// # Arguments
/// * `record` - 可签名记录
/// * `api_key` - 商户API密钥
/// * `sign_type` - 签名算法
///
/// # Returns
/// * 大写十六进制签名
pub fn sign_with<R: SignableRecord + ?Sized>(
    record: &R,
    api_key: &str,
    sign_type: SignType,
) -> Result<String> {
    let s = canonical_string(record, api_key)?;

    let signature = match sign_type {
        SignType::Md5 => hex::encode_upper(Md5::digest(s.as_bytes())),
        SignType::HmacSha256 => {
            let mut mac = HmacSha256::new_from_slice(api_key.as_bytes())
                .map_err(|e| WxPayError::InvalidInput(format!("Invalid HMAC key: {}", e)))?;
            mac.update(s.as_bytes());
            hex::encode_upper(mac.finalize().into_bytes())
        }
    };

    Ok(signature)
}

/// 使用MD5验证记录自带的签名
pub fn verify<R: SignableRecord + ?Sized>(record: &R, api_key: &str) -> bool {
    verify_with(record, api_key, SignType::Md5)
}

/// 使用指定算法验证记录自带的签名
///
/// 密钥为空等无法计算签名的情况一律视为验证失败
pub fn verify_with<R: SignableRecord + ?Sized>(
    record: &R,
    api_key: &str,
    sign_type: SignType,
) -> bool {
    ensure_signature(record, api_key, sign_type).is_ok()
}

/// 验证签名，失败时返回收到的与期望的签名
///
/// # Arguments
/// * `record` - 可签名记录
/// * `api_key` - 商户API密钥
/// * `sign_type` - 签名算法
///
/// # Returns
/// * 成功，或 `SignatureMismatch`
pub fn ensure_signature<R: SignableRecord + ?Sized>(
    record: &R,
    api_key: &str,
    sign_type: SignType,
) -> Result<()> {
    let expected = sign_with(record, api_key, sign_type)?;
    let received = record.signature();

    if signatures_match(&expected, received) {
        Ok(())
    } else {
        Err(WxPayError::SignatureMismatch {
            received: received.to_string(),
            expected,
        })
    }
}

/// 常量时间比较签名 (区分大小写，长度不同直接判定不等)
fn signatures_match(expected: &str, received: &str) -> bool {
    expected.as_bytes().ct_eq(received.as_bytes()).into()
}

/// 生成请求随机字符串
///
/// # Returns
/// * 32位字母数字随机串
pub fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LENGTH)
        .map(char::from)
        .collect()
}
