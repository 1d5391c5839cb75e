/// Basic example: Convert a synthetic image to ASCII art
///
/// Draws a bright disc over a horizontal gradient and prints the text for a
/// few palettes and pipeline settings.
use image::{DynamicImage, GrayImage, Luma};
use textify::{Cutoff, TextifyConfig, textify_image};

fn main() {
    println!("Textify - Basic Example");
    println!("=======================\n");

    let width = 160;
    let height = 120;
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    let img = GrayImage::from_fn(width, height, |x, y| {
        let dx = x as f32 - center_x;
        let dy = y as f32 - center_y;
        if (dx * dx + dy * dy).sqrt() < 40.0 {
            Luma([240])
        } else {
            Luma([(x * 160 / width) as u8])
        }
    });
    let img = DynamicImage::ImageLuma8(img);

    println!("Created test image: {}x{}\n", width, height);

    let plain = TextifyConfig {
        size: 60,
        ..Default::default()
    };
    let inverted = TextifyConfig {
        invert: true,
        ..plain.clone()
    }
    .with_alt();
    let posterized = TextifyConfig {
        quantize: 4,
        sharpen: 1,
        cutoff: Cutoff::Counts { low: 0, high: 0 },
        ..plain.clone()
    };

    let runs = [
        ("default palette", plain),
        ("alternative bundle, inverted", inverted),
        ("quantized to 4 levels, sharpened", posterized),
    ];

    for (label, config) in runs {
        let art = textify_image(&img, &config).expect("Failed to convert image");
        println!("{label} ({}x{}):", art.columns(), art.rows());
        println!("{art}\n");
    }
}
