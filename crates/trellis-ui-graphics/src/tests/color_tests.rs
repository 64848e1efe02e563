use super::*;

const EPS: f32 = 1e-4;

#[test]
fn hsl_round_trips_primary_and_mixed_colors() {
    for color in [
        Color::RED,
        Color::GREEN,
        Color::BLUE,
        Color::from_hex(0x6750A4),
        Color::rgba(0.2, 0.4, 0.6, 0.5),
    ] {
        let back = Color::from_hsl(color.to_hsl());
        assert!(back.approx_eq(&color, EPS), "{color:?} -> {back:?}");
    }
}

#[test]
fn grey_has_no_saturation() {
    let hsl = Color::rgb(0.5, 0.5, 0.5).to_hsl();
    assert_eq!(hsl.saturation, 0.0);
    assert!((hsl.lightness - 0.5).abs() < EPS);
}

#[test]
fn lighten_and_darken_clamp() {
    assert!(Color::RED.lighten(1.0).approx_eq(&Color::WHITE, EPS));
    assert!(Color::RED.darken(1.0).approx_eq(&Color::BLACK, EPS));
    let lighter = Color::RED.lighten(0.1).to_hsl();
    assert!((lighter.lightness - 0.6).abs() < EPS);
}

#[test]
fn lighten_preserves_alpha() {
    let color = Color::rgba(0.1, 0.2, 0.3, 0.25);
    assert_eq!(color.lighten(0.2).a(), 0.25);
}

#[test]
fn lerp_interpolates_all_channels() {
    let mid = Color::BLACK.lerp(Color::WHITE.with_alpha(0.0), 0.5);
    assert!(mid.approx_eq(&Color::rgba(0.5, 0.5, 0.5, 0.5), EPS));
    assert_eq!(Color::RED.lerp(Color::BLUE, 0.0), Color::RED);
    assert_eq!(Color::RED.lerp(Color::BLUE, 2.0), Color::BLUE);
}

#[test]
fn from_hex_decodes_channels() {
    assert_eq!(Color::from_hex(0xFF0000), Color::RED);
    assert_eq!(Color::from_hex(0x0000FF), Color::BLUE);
}
