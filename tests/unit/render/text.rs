use super::*;

fn lines(n: usize, h: f32) -> Vec<LineBox> {
    (0..n)
        .map(|i| LineBox {
            top: i as f32 * h,
            bottom: (i + 1) as f32 * h,
        })
        .collect()
}

#[test]
fn single_column_keeps_all_lines() {
    let (starts, h) = balance_columns(&lines(5, 10.0), 1);
    assert_eq!(starts, vec![0]);
    assert_eq!(h, 50.0);
}

#[test]
fn even_line_count_splits_in_half() {
    let (starts, h) = balance_columns(&lines(6, 10.0), 2);
    assert_eq!(starts, vec![0, 3]);
    assert_eq!(h, 30.0);
}

#[test]
fn odd_line_count_puts_extra_line_first() {
    let (starts, h) = balance_columns(&lines(5, 10.0), 2);
    assert_eq!(starts, vec![0, 3]);
    assert_eq!(h, 30.0);
}

#[test]
fn empty_and_single_line_paragraphs() {
    assert_eq!(balance_columns(&[], 2), (vec![0], 0.0));
    let (starts, h) = balance_columns(&lines(1, 12.0), 2);
    assert_eq!(starts, vec![0]);
    assert_eq!(h, 12.0);
}

#[test]
fn brush_from_rgba() {
    let b = TextBrushRgba8::from(Rgba8::new(1, 2, 3, 4));
    assert_eq!((b.r, b.g, b.b, b.a), (1, 2, 3, 4));
}
