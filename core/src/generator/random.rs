use alloc::string::{String, ToString};

use super::*;

/// Candidates discarded before giving up and using [`FALLBACK_EXPRESSION`].
const MAX_GENERATE_ATTEMPTS: u32 = 1000;

/// Known-good answer returned when the retry budget runs out.
const FALLBACK_EXPRESSION: &str = "12+3*4";

/// Builds candidate equations from randomly sized number tokens separated
/// by random operators, keeping the first one whose value is a whole
/// number. A divisor tile directly after `/` is drawn from 1-9, so a
/// division by zero can never be constructed.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomEquationGenerator {
    seed: u64,
}

impl RandomEquationGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl EquationGenerator for RandomEquationGenerator {
    fn generate(self) -> Answer {
        use rand::prelude::*;

        let mut rng = SmallRng::seed_from_u64(self.seed);

        for attempt in 0..MAX_GENERATE_ATTEMPTS {
            let candidate = build_candidate(&mut rng);
            match eval_expression(&candidate) {
                Some(value) if is_integer_value(value) => {
                    log::debug!("generated {} = {} ({} discarded)", candidate, value, attempt);
                    let expression =
                        Expression::parse(&candidate).expect("candidate fills all six tiles");
                    return Answer::from_expression(expression)
                        .expect("candidate value already checked");
                }
                _ => log::trace!("discarding {}", candidate),
            }
        }

        log::warn!(
            "no integer-valued equation within {} attempts, using fallback",
            MAX_GENERATE_ATTEMPTS
        );
        let expression = Expression::parse(FALLBACK_EXPRESSION).expect("fallback is well formed");
        Answer::from_expression(expression).expect("fallback evaluates to a whole number")
    }
}

/// Assembles one 6-character candidate: a first number of uniformly random
/// length 1-3, an operator, and a remainder decomposition that exactly
/// fills the budget.
fn build_candidate<R: rand::RngExt>(rng: &mut R) -> String {
    let mut equation = String::new();
    push_number(&mut equation, number_with_random_length(rng, 3));
    let first_operator = random_operator(rng);
    equation.push(first_operator);

    match equation.len() {
        // one 2-digit number left
        4 => push_number(&mut equation, two_digit(rng)),
        // 3 tiles left: a 3-digit number, or digit-operator-digit
        3 => {
            let next_operator = random_operator(rng);
            if rng.random_bool(0.5) {
                push_number(&mut equation, three_digit(rng));
            } else {
                push_number(&mut equation, single_number_after(rng, first_operator));
                equation.push(next_operator);
                push_number(&mut equation, single_number_after(rng, next_operator));
            }
        }
        // 4 tiles left: a number of length 1 or 2, an operator, and the
        // complementary length
        _ => {
            let next_operator = random_operator(rng);
            let middle = if rng.random_bool(0.5) {
                single_number_after(rng, first_operator)
            } else {
                two_digit(rng)
            };
            push_number(&mut equation, middle);
            equation.push(next_operator);
            if equation.len() == 4 {
                push_number(&mut equation, two_digit(rng));
            } else {
                push_number(&mut equation, single_number_after(rng, next_operator));
            }
        }
    }

    equation
}

fn push_number(equation: &mut String, number: u32) {
    equation.push_str(&number.to_string());
}

fn random_operator<R: rand::RngExt>(rng: &mut R) -> char {
    OPERATORS[rng.random_range(0..OPERATORS.len())]
}

/// A number of uniformly random length between 1 and `max_len` digits.
fn number_with_random_length<R: rand::RngExt>(rng: &mut R, max_len: u32) -> u32 {
    match rng.random_range(1..=max_len) {
        1 => one_digit(rng),
        2 => two_digit(rng),
        _ => three_digit(rng),
    }
}

/// A 1-digit number to place directly after `operator`; never zero when
/// it would be a divisor.
fn single_number_after<R: rand::RngExt>(rng: &mut R, operator: char) -> u32 {
    if operator == '/' {
        rng.random_range(1..10)
    } else {
        one_digit(rng)
    }
}

fn one_digit<R: rand::RngExt>(rng: &mut R) -> u32 {
    rng.random_range(0..10)
}

fn two_digit<R: rand::RngExt>(rng: &mut R) -> u32 {
    rng.random_range(10..100)
}

fn three_digit<R: rand::RngExt>(rng: &mut R) -> u32 {
    rng.random_range(100..1000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    #[test]
    fn generated_answers_satisfy_every_structural_property() {
        for seed in 0..128 {
            let answer = RandomEquationGenerator::new(seed).generate();
            let src = answer.expression().as_str();
            let bytes = src.as_bytes();

            assert_eq!(src.len(), TILES_PER_GUESS, "{}", src);
            assert!(src.chars().all(is_expression_char), "{}", src);
            assert!(bytes[0].is_ascii_digit(), "{}", src);
            assert!(bytes[TILES_PER_GUESS - 1].is_ascii_digit(), "{}", src);
            assert!(
                !bytes
                    .windows(2)
                    .any(|p| is_operator(p[0] as char) && is_operator(p[1] as char)),
                "{}",
                src
            );
            assert!(src.chars().any(is_operator), "{}", src);

            let value = eval_expression(src).unwrap();
            assert!(is_integer_value(value), "{} = {}", src, value);
            assert_eq!(value as i64, answer.value());
        }
    }

    #[test]
    fn same_seed_yields_the_same_answer() {
        let a = RandomEquationGenerator::new(42).generate();
        let b = RandomEquationGenerator::new(42).generate();
        assert_eq!(a, b);
    }

    #[test]
    fn candidates_never_divide_by_a_zero_tile() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..2000 {
            let candidate = build_candidate(&mut rng);
            assert!(!candidate.contains("/0"), "{}", candidate);
        }
    }

    #[test]
    fn fallback_expression_is_a_valid_answer() {
        let answer =
            Answer::from_expression(Expression::parse(FALLBACK_EXPRESSION).unwrap()).unwrap();
        assert_eq!(answer.value(), 24);
    }
}
