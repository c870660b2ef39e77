// 工具函数模块
// 包含签名、XML编解码、输入校验、二维码生成等通用工具

pub mod crypto;
pub mod qr;
pub mod validation;
pub mod xml;

// 重新导出常用函数
pub use crypto::*;
pub use qr::*;
pub use validation::*;
pub use xml::{from_xml, to_xml};
