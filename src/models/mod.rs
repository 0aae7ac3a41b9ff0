pub mod knn;
pub mod logistic_regression;
pub mod naive_bayes;
pub mod random_forest;

pub mod classifier_trait;
pub mod factory;
