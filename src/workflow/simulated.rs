//! Fixed illustrative output for simulated mode
//!
//! When the service is unreachable the analysis stage produces these
//! documents instead of calling the network, after an artificial delay.
//! Five numbered items each, so the downstream parser behaves exactly as it
//! would on real output.

pub(crate) fn simulated_business_requirements() -> String {
    "# Business Requirements\n\
     1. The system appears to handle financial transactions, specifically account balances and updates.\n\
     2. There is a validation process for transaction codes, indicating business rules around transaction types.\n\
     3. The code suggests a batch processing system that processes multiple records sequentially.\n\
     4. Error handling and reporting requirements exist for invalid transactions.\n\
     5. The system needs to maintain audit trails for financial operations."
        .to_string()
}

pub(crate) fn simulated_technical_requirements(source_language: &str, target_language: &str) -> String {
    format!(
        "# Technical Requirements\n\
         1. Code needs to be migrated from legacy {src} to {tgt} while preserving all business logic.\n\
         2. File handling must be converted to appropriate database or file operations in {tgt}.\n\
         3. {src}'s fixed decimal precision must be maintained in the target language.\n\
         4. Error handling mechanisms need to be implemented using modern exception handling.\n\
         5. Batch processing paradigm should be adapted to object-oriented design.",
        src = source_language,
        tgt = target_language,
    )
}
