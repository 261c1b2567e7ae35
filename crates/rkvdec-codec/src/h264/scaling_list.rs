//! 量化矩阵重排.
//!
//! 控制结构中的量化列表为 zig-zag 扫描顺序, 硬件要求光栅顺序.
//! 6 个 4x4 列表在前, 6 个 8x8 列表在后, 连续存放.

use super::controls::ScalingMatrix;

/// 4x4 zig-zag 扫描位置 → 光栅位置
pub const ZIGZAG_4X4: [usize; 16] = [0, 1, 4, 8, 5, 2, 3, 6, 9, 12, 13, 10, 7, 11, 14, 15];

/// 8x8 zig-zag 扫描位置 → 光栅位置
pub const ZIGZAG_8X8: [usize; 64] = [
    0, 1, 8, 16, 9, 2, 3, 10, 17, 24, 32, 25, 18, 11, 4, 5, 12, 19, 26, 33, 40, 48, 41, 34, 27,
    20, 13, 6, 7, 14, 21, 28, 35, 42, 49, 56, 57, 50, 43, 36, 29, 22, 15, 23, 30, 37, 44, 51, 58,
    59, 52, 45, 38, 31, 39, 46, 53, 60, 61, 54, 47, 55, 62, 63,
];

/// 重排后全部列表的字节数
pub const SCALING_LIST_BYTES: usize = 6 * 16 + 6 * 64;

/// 把 `matrix` 的全部列表转换为光栅顺序写入 `dst` 起始处
pub fn reorder(matrix: &ScalingMatrix, dst: &mut [u8]) {
    let (dst_4x4, dst_8x8) = dst[..SCALING_LIST_BYTES].split_at_mut(6 * 16);

    for (src, out) in matrix
        .scaling_list_4x4
        .iter()
        .zip(dst_4x4.chunks_exact_mut(16))
    {
        for (j, &coeff) in src.iter().enumerate() {
            out[ZIGZAG_4X4[j]] = coeff;
        }
    }

    for (src, out) in matrix
        .scaling_list_8x8
        .iter()
        .zip(dst_8x8.chunks_exact_mut(64))
    {
        for (j, &coeff) in src.iter().enumerate() {
            out[ZIGZAG_8X8[j]] = coeff;
        }
    }
}
