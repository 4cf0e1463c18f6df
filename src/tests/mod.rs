mod calculus_tests;
mod conversion_tests;
