// ============================================================================
// Basic Usage Example
// ============================================================================

use radix_math::prelude::*;
use std::sync::Arc;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Radix Math Example ===\n");

    let one = Decimal::one();
    let three = Decimal::from(3);

    // Rounded division carries its signals
    println!("Dividing 1 by 3 at increasing precision...");
    for precision in [5u64, 10, 30] {
        let ctx = PrecisionContext::for_precision(precision);
        let third = one.divide(&three, Some(&ctx)).unwrap();
        println!("  prec {:>2}: {} [{}]", precision, third.value, third.signals);
    }

    // Without a precision only terminating quotients are allowed
    match one.divide(&three, None) {
        Ok(outcome) => println!("\nunexpected exact quotient {}", outcome.value),
        Err(err) => println!("\nUnlimited 1/3: {}", err),
    }

    // Traps turn signals into errors and keep the untrapped result
    let strict = PrecisionContext::decimal64().with_traps(SignalSet::INEXACT);
    if let Err(err) = one.divide(&three, Some(&strict)) {
        if let Some(trap) = err.as_trap() {
            println!("Trapped {} with result {}", trap.signal, trap.result);
        }
    }

    // A logging stack reports every signal through tracing
    println!("\n=== Logging Stack ===");
    let math = RadixMathBuilder::new(DecimalHelper::new()).logging().build();
    let ctx = PrecisionContext::decimal128();
    let two = Decimal::from(2);
    println!("sqrt(2) = {}", math.square_root(&two, &ctx).unwrap().value);
    println!("ln(2)   = {}", math.ln(&two, &ctx).unwrap().value);
    println!("pi      = {}", math.pi(&ctx).unwrap().value);

    // Recording observer
    let recorder = Arc::new(SignalRecorder::new());
    let recording = create_stack(DecimalHelper::new(), recorder.clone());
    let bounded = PrecisionContext::for_precision(3).with_exponent_range(-5, 5);
    let huge: Decimal = "9.99E+5".parse().unwrap();
    let _ = recording.multiply(&huge, &Decimal::from(10), &bounded);
    println!("\nRecorded signals: {}", recorder.recorded());

    // Binary floating point
    println!("\n=== Binary Floats ===");
    let binary64 = PrecisionContext::binary64();
    let tenth = BinaryFloat::from_f64(0.1);
    let sum = tenth
        .add(&BinaryFloat::from_f64(0.2), Some(&binary64))
        .unwrap();
    println!("0.1 + 0.2 = {} ({})", sum.value.to_f64(), sum.signals);
    println!("exact value of 0.1: {}", tenth.to_decimal());
}
