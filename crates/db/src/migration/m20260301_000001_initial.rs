//! Initial database migration.
//!
//! Creates the enum types, master-data tables, receipt and distribution
//! tables with their items, the `updated_at` trigger and the list indexes.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS AND SHARED FUNCTIONS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(UPDATED_AT_FUNCTION_SQL).await?;

        // ============================================================
        // PART 2: USERS AND MASTER DATA
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(DONORS_SQL).await?;
        db.execute_unprepared(CATEGORIES_SQL).await?;
        db.execute_unprepared(BENEFICIARIES_SQL).await?;
        db.execute_unprepared(PROGRAMS_SQL).await?;

        // ============================================================
        // PART 3: RECEIPTS
        // ============================================================
        db.execute_unprepared(RECEIPTS_SQL).await?;
        db.execute_unprepared(RECEIPT_ITEMS_SQL).await?;

        // ============================================================
        // PART 4: DISTRIBUTIONS
        // ============================================================
        db.execute_unprepared(DISTRIBUTIONS_SQL).await?;
        db.execute_unprepared(DISTRIBUTION_ITEMS_SQL).await?;

        // ============================================================
        // PART 5: TRIGGERS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE user_role AS ENUM ('admin', 'staff', 'viewer');

CREATE TYPE beneficiary_status AS ENUM ('active', 'inactive', 'pending');

-- Receipt item classification
CREATE TYPE fund_type AS ENUM ('zakat', 'infaq', 'sadaqah');
CREATE TYPE zakat_type AS ENUM ('fitrah', 'maal');

-- Bucket a distribution draws from
CREATE TYPE source_fund_type AS ENUM ('zakat_fitrah', 'zakat_maal', 'infaq', 'sadaqah');
";

const UPDATED_AT_FUNCTION_SQL: &str = r"
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL,
    password_hash VARCHAR(255) NOT NULL,
    full_name VARCHAR(255) NOT NULL,
    role user_role NOT NULL DEFAULT 'viewer',
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT users_email_key UNIQUE (email)
);

CREATE INDEX idx_users_role ON users(role);
";

const DONORS_SQL: &str = r"
CREATE TABLE donors (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(150) NOT NULL,
    phone VARCHAR(20) NOT NULL,
    address TEXT NOT NULL,
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT donors_phone_key UNIQUE (phone)
);

CREATE INDEX idx_donors_name ON donors(lower(name));
";

const CATEGORIES_SQL: &str = r"
CREATE TABLE categories (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(100) NOT NULL,
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT categories_name_key UNIQUE (name)
);
";

const BENEFICIARIES_SQL: &str = r"
CREATE TABLE beneficiaries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(150) NOT NULL,
    phone VARCHAR(20) NOT NULL,
    address TEXT NOT NULL,
    category_id UUID NOT NULL REFERENCES categories(id) ON DELETE RESTRICT,
    status beneficiary_status NOT NULL DEFAULT 'pending',
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT beneficiaries_phone_key UNIQUE (phone)
);

CREATE INDEX idx_beneficiaries_category ON beneficiaries(category_id);
CREATE INDEX idx_beneficiaries_status ON beneficiaries(status);
CREATE INDEX idx_beneficiaries_name ON beneficiaries(lower(name));
";

const PROGRAMS_SQL: &str = r"
CREATE TABLE programs (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(150) NOT NULL,
    program_type VARCHAR(50) NOT NULL,
    description TEXT,
    active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_programs_active ON programs(active);
";

const RECEIPTS_SQL: &str = r"
CREATE TABLE receipts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    donor_id UUID NOT NULL REFERENCES donors(id) ON DELETE RESTRICT,
    receipt_number VARCHAR(50) NOT NULL,
    receipt_date DATE NOT NULL,
    payment_method VARCHAR(50) NOT NULL,
    total_amount NUMERIC(18, 2) NOT NULL CHECK (total_amount > 0),
    notes TEXT,
    created_by UUID NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT receipts_receipt_number_key UNIQUE (receipt_number)
);

CREATE INDEX idx_receipts_donor ON receipts(donor_id);
CREATE INDEX idx_receipts_date ON receipts(receipt_date DESC, created_at DESC);
";

const RECEIPT_ITEMS_SQL: &str = r"
CREATE TABLE receipt_items (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    receipt_id UUID NOT NULL REFERENCES receipts(id) ON DELETE CASCADE,
    line_no INTEGER NOT NULL,
    fund_type fund_type NOT NULL,
    zakat_type zakat_type,
    person_count INTEGER CHECK (person_count IS NULL OR person_count > 0),
    amount NUMERIC(18, 2) NOT NULL CHECK (amount > 0),
    rice_kg NUMERIC(10, 2) CHECK (rice_kg IS NULL OR rice_kg > 0),
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT receipt_items_line_key UNIQUE (receipt_id, line_no),
    -- zakat carries its sub-type, the voluntary funds never do
    CONSTRAINT receipt_items_zakat_type_check CHECK (
        (fund_type = 'zakat') = (zakat_type IS NOT NULL)
    )
);

CREATE INDEX idx_receipt_items_fund ON receipt_items(fund_type, zakat_type);
";

const DISTRIBUTIONS_SQL: &str = r"
CREATE TABLE distributions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    distribution_date DATE NOT NULL,
    program_id UUID REFERENCES programs(id) ON DELETE RESTRICT,
    source_fund_type source_fund_type NOT NULL,
    total_amount NUMERIC(18, 2) NOT NULL CHECK (total_amount > 0),
    notes TEXT,
    created_by UUID NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_distributions_program ON distributions(program_id);
CREATE INDEX idx_distributions_date ON distributions(distribution_date DESC, created_at DESC);
CREATE INDEX idx_distributions_source ON distributions(source_fund_type);
";

const DISTRIBUTION_ITEMS_SQL: &str = r"
CREATE TABLE distribution_items (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    distribution_id UUID NOT NULL REFERENCES distributions(id) ON DELETE CASCADE,
    line_no INTEGER NOT NULL,
    beneficiary_id UUID NOT NULL REFERENCES beneficiaries(id) ON DELETE RESTRICT,
    amount NUMERIC(18, 2) NOT NULL CHECK (amount > 0),
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT distribution_items_line_key UNIQUE (distribution_id, line_no)
);

CREATE INDEX idx_distribution_items_beneficiary ON distribution_items(beneficiary_id);
";

const TRIGGERS_SQL: &str = r"
CREATE TRIGGER trg_users_updated_at BEFORE UPDATE ON users
FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_donors_updated_at BEFORE UPDATE ON donors
FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_categories_updated_at BEFORE UPDATE ON categories
FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_beneficiaries_updated_at BEFORE UPDATE ON beneficiaries
FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_programs_updated_at BEFORE UPDATE ON programs
FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_receipts_updated_at BEFORE UPDATE ON receipts
FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_distributions_updated_at BEFORE UPDATE ON distributions
FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const DROP_ALL_SQL: &str = r"
-- ============================================================
-- DROP ALL: Rollback migration
-- Order matters due to foreign key constraints
-- ============================================================

DROP TABLE IF EXISTS distribution_items CASCADE;
DROP TABLE IF EXISTS distributions CASCADE;
DROP TABLE IF EXISTS receipt_items CASCADE;
DROP TABLE IF EXISTS receipts CASCADE;
DROP TABLE IF EXISTS programs CASCADE;
DROP TABLE IF EXISTS beneficiaries CASCADE;
DROP TABLE IF EXISTS categories CASCADE;
DROP TABLE IF EXISTS donors CASCADE;
DROP TABLE IF EXISTS users CASCADE;

DROP FUNCTION IF EXISTS set_updated_at() CASCADE;

DROP TYPE IF EXISTS source_fund_type;
DROP TYPE IF EXISTS zakat_type;
DROP TYPE IF EXISTS fund_type;
DROP TYPE IF EXISTS beneficiary_status;
DROP TYPE IF EXISTS user_role;
";
