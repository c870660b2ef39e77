// 二维码生成工具
// 将扫码支付返回的 code_url 渲染为可直接展示的二维码图片

use std::io::Cursor;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use qrcode::{Color, QrCode};

/// 扫码支付链接前缀
pub const CODE_URL_PREFIX: &str = "weixin://wxpay/";

/// 每个模块的像素边长
const MODULE_PIXELS: u32 = 8;

/// 四周留白的模块数
const QUIET_ZONE: u32 = 4;

/// 生成扫码支付二维码
///
/// # Arguments
/// * `code_url` - 统一下单返回的二维码链接 (如 weixin://wxpay/bizpayurl?pr=...)
///
/// # Returns
/// * Base64编码的PNG图片数据
pub fn generate_code_url_qr(code_url: &str) -> Result<String> {
    if code_url.is_empty() {
        anyhow::bail!("code_url cannot be empty");
    }

    let qr_code = QrCode::new(code_url.as_bytes()).context("Failed to create QR code")?;
    let modules = qr_code.width() as u32;
    let colors = qr_code.to_colors();

    // 按模块放大并加留白
    let side = (modules + QUIET_ZONE * 2) * MODULE_PIXELS;
    let image = GrayImage::from_fn(side, side, |x, y| {
        let mx = (x / MODULE_PIXELS) as i64 - QUIET_ZONE as i64;
        let my = (y / MODULE_PIXELS) as i64 - QUIET_ZONE as i64;
        let inside = mx >= 0 && my >= 0 && (mx as u32) < modules && (my as u32) < modules;
        if inside && colors[(my as usize) * modules as usize + mx as usize] == Color::Dark {
            Luma([0u8])
        } else {
            Luma([255u8])
        }
    });

    let mut png_data = Vec::new();
    DynamicImage::ImageLuma8(image)
        .write_to(&mut Cursor::new(&mut png_data), ImageFormat::Png)
        .context("Failed to encode PNG")?;

    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&png_data)))
}

/// 检查是否为微信扫码支付链接
pub fn is_code_url(content: &str) -> bool {
    content.starts_with(CODE_URL_PREFIX) && content.len() > CODE_URL_PREFIX.len()
}
