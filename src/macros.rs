macro_rules! impl_to_perf_string_on_to_string {
    ($($t:ty), *) => {
        $(
            impl ToPerfString for $t {
                fn to_perf_string(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

/// Lets you simply create a resource from multiple metrics. It's a bit like the vec! macro.
/// ```rust
/// # #[macro_use]
/// # extern crate check_ups;
/// #
/// # use check_ups::{ThresholdMetric, TriggerIfValue};
/// #
/// # fn main() {
/// let m1 = ThresholdMetric::new("OutputLoad", 40, 70, 90, TriggerIfValue::Greater);
/// let m2 = ThresholdMetric::new("TimeLeft", 25, 30, 10, TriggerIfValue::Less);
/// let resource = resource![m1, m2];
/// assert_eq!(resource.metrics().len(), 2);
/// # }
/// ```
#[macro_export]
macro_rules! resource {
    ($( $m:expr ), *) => {
        {
            use $crate::Resource;
            let mut r = Resource::new(None, None);
            $(
                r.push($m);
            )*
            r
        }
    };
}

/// Builds `label=value;warn;crit`, dropping trailing empty fields.
macro_rules! metric_string {
    ($name:expr, $( $tps:expr), *) => {
        {
            let mut s = String::new();
            s.push_str(&format!("{}=", $name));
            $(
                s.push_str(&$tps.to_perf_string());
                s.push(';');
            )*
            s.trim_end_matches(';').to_string()
        }
    };
}
