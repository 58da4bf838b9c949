//! Fixed advice templates.

pub(crate) fn resampling(column: &str) -> String {
    format!(
        "For the imbalanced column '{column}', consider using resampling techniques like \
         SMOTE (Synthetic Minority Over-sampling Technique) to create synthetic data for the \
         minority class, or RandomOverSampler to duplicate minority class samples. \
         Alternatively, RandomUnderSampler can reduce the majority class."
    )
}

pub(crate) fn feature_engineering(column: &str, skewness: f64) -> String {
    format!(
        "The feature '{column}' is highly skewed (skewness: {skewness:.2}). \
         This can negatively impact some models. Consider applying a log transformation or a \
         Box-Cox transformation to make its distribution more normal."
    )
}

pub(crate) fn data_imputation(columns: &[&str]) -> String {
    format!(
        "Missing data was found in columns: {}. \
         For numerical data, consider imputing with the mean or median. \
         For categorical data, consider imputing with the mode. \
         For more advanced cases, KNNImputer or model-based imputation can be effective.",
        columns.join(", ")
    )
}
