/// 可参与加权汇总的项
///
/// 任务、类别、周期都通过这个 trait 汇总，计算规则只有一份。
pub trait Weighted {
    /// 得分率，`None` 表示尚未评分
    fn fraction(&self) -> Option<f64>;
    fn weight(&self) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedItem {
    pub fraction: Option<f64>,
    pub weight: f64,
}

impl WeightedItem {
    pub fn new(fraction: Option<f64>, weight: f64) -> Self {
        Self { fraction, weight }
    }

    /// 由百分比构造，用于把下一级的汇总结果作为上一级的输入
    pub fn from_percentage(percentage: Option<f64>, weight: f64) -> Self {
        Self {
            fraction: percentage.map(|p| p / 100.0),
            weight,
        }
    }
}

impl Weighted for WeightedItem {
    fn fraction(&self) -> Option<f64> {
        self.fraction
    }

    fn weight(&self) -> f64 {
        self.weight
    }
}

impl<T: Weighted + ?Sized> Weighted for &T {
    fn fraction(&self) -> Option<f64> {
        (**self).fraction()
    }

    fn weight(&self) -> f64 {
        (**self).weight()
    }
}

/// 加权汇总为百分比
///
/// 未评分项同时从分子和分母中剔除，分母只计算实际出现的权重。
/// 分母为 0（全部未评分或权重全为 0）时返回 `None`，不返回 0 或 NaN。
pub fn aggregate<I>(items: I) -> Option<f64>
where
    I: IntoIterator,
    I::Item: Weighted,
{
    let (numerator, denominator) = items
        .into_iter()
        .filter_map(|item| item.fraction().map(|f| (f * item.weight(), item.weight())))
        .fold((0.0_f64, 0.0_f64), |(n, d), (fw, w)| (n + fw, d + w));

    if denominator <= 0.0 || denominator.is_nan() {
        return None;
    }

    Some(numerator / denominator * 100.0)
}
