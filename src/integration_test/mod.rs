#![cfg(test)]
// Suppress 'unused' warnings for the testsuite
#![allow(unused)]

mod mix_test;
