//! ベクトル演算
//!
//! 埋め込みベクトルの正規化・内積・最良一致の選択。

/// 埋め込みベクトル
pub type Embedding = Vec<f32>;

/// ユークリッドノルムで割って単位ベクトルにする
///
/// ノルム0のベクトルは特別扱いしない（結果は NaN になる）。
pub fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    for x in vector.iter_mut() {
        *x /= norm;
    }
}

/// 内積（単位ベクトル同士ならコサイン類似度）
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// 最も類似度の高い候補のインデックスとスコア
///
/// 同点の場合は先に現れた候補を採用する。候補が空なら `None`。
/// NaN は最大値として扱い、最初の NaN を返す（numpy の argmax と同じ順序付け）。
pub fn best_match(query: &[f32], candidates: &[Embedding]) -> Option<(usize, f32)> {
    let mut scores = candidates.iter().map(|c| dot(query, c)).enumerate();
    let first = scores.next()?;
    Some(scores.fold(first, |best, (idx, score)| {
        if !best.1.is_nan() && (score.is_nan() || score > best.1) {
            (idx, score)
        } else {
            best
        }
    }))
}

/// 書き込み用に小数第3位で丸める
pub fn round_score(score: f32) -> f64 {
    (score as f64 * 1000.0).round() / 1000.0
}
