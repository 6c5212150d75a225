mod mat_mul_tests;
mod others_tests;
