use std::thread::Scope;

use crossbeam_channel::{Receiver, Select, Sender, bounded};

/// Capacity of the combined stream
pub const MERGED_BUFFER: usize = 64;

/// Fan-in: one stream carrying every item of every input.
///
/// The returned stream closes once, after the last input has closed. Ordering across
/// inputs is unspecified.
pub fn merge_streams<'scope, 'env, T: Send + 'scope>(
    scope: &'scope Scope<'scope, 'env>,
    inputs: Vec<Receiver<T>>,
) -> Receiver<T> {
    let (output, merged) = bounded(MERGED_BUFFER);
    scope.spawn(move || forward_all(inputs, output));
    merged
}

/// Forward items until every input is closed, or until the output is dropped.
///
/// Returns the number of items forwarded.
pub fn forward_all<T>(inputs: Vec<Receiver<T>>, output: Sender<T>) -> usize {
    let mut select = Select::new();
    for input in &inputs {
        select.recv(input);
    }

    let mut open = inputs.len();
    let mut forwarded = 0;
    while open > 0 {
        let operation = select.select();
        let index = operation.index();
        match operation.recv(&inputs[index]) {
            Ok(item) => {
                if output.send(item).is_err() {
                    log::debug!("Merged stream dropped, stopping fan-in");
                    return forwarded;
                }
                forwarded += 1;
            }
            Err(_) => {
                select.remove(index);
                open -= 1;
            }
        }
    }
    log::debug!("All {} worker streams closed after {} items", inputs.len(), forwarded);
    forwarded
}
