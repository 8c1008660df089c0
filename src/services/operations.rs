// ============================================================================
// OPERATIONS - Documentos GraphQL usados por la UI
// ============================================================================
// Las mutations devuelven el id (o un booleano) como escalar; las páginas
// vuelven a pedir la lista después de mutar.
// ============================================================================

use crate::services::graphql::Operation;

// ----------------------------------------------------------------------------
// Usuarios / auth
// ----------------------------------------------------------------------------

pub const ME: Operation = Operation::query("Me", "me", r#"
query Me {
  me { id fullName email }
}"#);

pub const USERS: Operation = Operation::query("Users", "users", r#"
query Users {
  users { nodes { id fullName email } }
}"#);

pub const USER_BY_ID: Operation = Operation::query("UserById", "userById", r#"
query UserById($id: UUID!) {
  userById(id: $id) { id fullName }
}"#);

pub const REGISTER: Operation = Operation::mutation("Register", "register", r#"
mutation Register($input: RegisterInput!) {
  register(input: $input) {
    token
    user { id email firstName lastName }
  }
}"#);

// ----------------------------------------------------------------------------
// Proyectos
// ----------------------------------------------------------------------------

pub const PROJECTS: Operation = Operation::query("Projects", "projects", r#"
query Projects($filter: ProjectFilterInput) {
  projects(filter: $filter) {
    nodes {
      id name description iconBase64 accessType createdAt updatedAt
      ownerId ownerFullName projectUsersCount testCasesCount defectsCount
    }
  }
}"#);

pub const PROJECT_BY_ID: Operation = Operation::query("ProjectById", "projectById", r#"
query ProjectById($id: UUID!) {
  projectById(id: $id) {
    id name description iconBase64 accessType createdAt updatedAt
    ownerId ownerFullName projectUsersCount testCasesCount defectsCount
  }
}"#);

pub const CREATE_PROJECT: Operation = Operation::mutation("CreateProject", "createProject", r#"
mutation CreateProject($input: ProjectCreateInput!) {
  createProject(input: $input)
}"#);

pub const UPDATE_PROJECT: Operation = Operation::mutation("UpdateProject", "updateProject", r#"
mutation UpdateProject($id: UUID!, $input: ProjectUpdateInput!) {
  updateProject(id: $id, input: $input)
}"#);

pub const DELETE_PROJECT: Operation = Operation::mutation("DeleteProject", "deleteProject", r#"
mutation DeleteProject($id: UUID!) {
  deleteProject(id: $id)
}"#);

// ----------------------------------------------------------------------------
// Test suites
// ----------------------------------------------------------------------------

pub const TEST_SUITES: Operation = Operation::query("TestSuitesByProjectId", "testSuitesByProjectId", r#"
query TestSuitesByProjectId($projectId: UUID!, $filter: TestSuiteFilterInput) {
  testSuitesByProjectId(projectId: $projectId, filter: $filter) {
    nodes { id name description preconditions testCasesCount }
  }
}"#);

pub const CREATE_TEST_SUITE: Operation = Operation::mutation("CreateTestSuite", "createTestSuite", r#"
mutation CreateTestSuite($input: TestSuiteCreateInput!) {
  createTestSuite(input: $input)
}"#);

pub const UPDATE_TEST_SUITE: Operation = Operation::mutation("UpdateTestSuite", "updateTestSuite", r#"
mutation UpdateTestSuite($id: UUID!, $input: TestSuiteUpdateInput!) {
  updateTestSuite(id: $id, input: $input)
}"#);

pub const DELETE_TEST_SUITE: Operation = Operation::mutation("DeleteTestSuite", "deleteTestSuite", r#"
mutation DeleteTestSuite($id: UUID!) {
  deleteTestSuite(id: $id)
}"#);

// ----------------------------------------------------------------------------
// Test cases
// ----------------------------------------------------------------------------

pub const TEST_CASES: Operation = Operation::query("TestCasesByProjectId", "testCasesByProjectId", r#"
query TestCasesByProjectId($projectId: UUID!, $filter: TestCaseFilterInput) {
  testCasesByProjectId(projectId: $projectId, filter: $filter) {
    nodes { id title priority severity }
  }
}"#);

pub const TEST_CASE_BY_ID: Operation = Operation::query("TestCaseById", "testCaseById", r#"
query TestCaseById($id: UUID!) {
  testCaseById(id: $id) {
    id projectId suiteId title description preconditions postconditions
    status priority severity createdAt updatedAt createdById parameters customFields
    steps { id testCaseId description expectedResult position }
  }
}"#);

pub const CREATE_TEST_CASE: Operation = Operation::mutation("CreateTestCase", "createTestCase", r#"
mutation CreateTestCase($input: TestCaseCreateInput!) {
  createTestCase(input: $input)
}"#);

pub const DELETE_TEST_CASE: Operation = Operation::mutation("DeleteTestCase", "deleteTestCase", r#"
mutation DeleteTestCase($id: UUID!) {
  deleteTestCase(id: $id)
}"#);

pub const CREATE_TEST_STEP: Operation = Operation::mutation("CreateTestStep", "createTestStep", r#"
mutation CreateTestStep($input: TestStepCreateInput!) {
  createTestStep(input: $input)
}"#);

// ----------------------------------------------------------------------------
// Defectos
// ----------------------------------------------------------------------------

pub const DEFECTS: Operation = Operation::query("DefectsByProjectId", "defectsByProjectId", r#"
query DefectsByProjectId($projectId: UUID!, $filter: DefectFilterInput) {
  defectsByProjectId(projectId: $projectId, filter: $filter) {
    nodes { id title actualResult severity createdAt createdById }
  }
}"#);

pub const CREATE_DEFECT: Operation = Operation::mutation("CreateDefect", "createDefect", r#"
mutation CreateDefect($input: DefectCreateInput!) {
  createDefect(input: $input)
}"#);

pub const UPDATE_DEFECT: Operation = Operation::mutation("UpdateDefect", "updateDefect", r#"
mutation UpdateDefect($id: UUID!, $input: DefectUpdateInput!) {
  updateDefect(id: $id, input: $input)
}"#);

pub const DELETE_DEFECT: Operation = Operation::mutation("DeleteDefect", "deleteDefect", r#"
mutation DeleteDefect($id: UUID!) {
  deleteDefect(id: $id)
}"#);

// ----------------------------------------------------------------------------
// Milestones
// ----------------------------------------------------------------------------

pub const MILESTONES: Operation = Operation::query("MilestonesByProjectId", "milestonesByProjectId", r#"
query MilestonesByProjectId($projectId: UUID!, $filter: MilestoneFilterInput) {
  milestonesByProjectId(projectId: $projectId, filter: $filter) {
    nodes { id name description dueDate testRunsCount }
  }
}"#);

pub const MILESTONE_BY_ID: Operation = Operation::query("MilestoneById", "milestoneById", r#"
query MilestoneById($id: UUID!) {
  milestoneById(id: $id) { id name }
}"#);

pub const CREATE_MILESTONE: Operation = Operation::mutation("CreateMilestone", "createMilestone", r#"
mutation CreateMilestone($input: MilestoneCreateInput!) {
  createMilestone(input: $input)
}"#);

pub const UPDATE_MILESTONE: Operation = Operation::mutation("UpdateMilestone", "updateMilestone", r#"
mutation UpdateMilestone($id: UUID!, $input: MilestoneUpdateInput!) {
  updateMilestone(id: $id, input: $input)
}"#);

pub const DELETE_MILESTONE: Operation = Operation::mutation("DeleteMilestone", "deleteMilestone", r#"
mutation DeleteMilestone($id: UUID!) {
  deleteMilestone(id: $id)
}"#);

// ----------------------------------------------------------------------------
// Test runs
// ----------------------------------------------------------------------------

pub const TEST_RUNS: Operation = Operation::query("TestRunsByProjectId", "testRunsByProjectId", r#"
query TestRunsByProjectId($projectId: UUID!, $filter: TestRunFilterInput) {
  testRunsByProjectId(projectId: $projectId, filter: $filter) {
    nodes { id name description milestoneId status createdAt }
  }
}"#);

pub const TEST_RUN_BY_ID: Operation = Operation::query("TestRunById", "testRunById", r#"
query TestRunById($id: UUID!) {
  testRunById(id: $id) {
    id name description milestoneId status createdAt
    testRunTestCases {
      testCase { id title priority severity }
      status
    }
    defects { id title actualResult }
  }
}"#);

pub const CREATE_TEST_RUN: Operation = Operation::mutation("CreateTestRun", "createTestRun", r#"
mutation CreateTestRun($input: TestRunCreateInput!) {
  createTestRun(input: $input)
}"#);

pub const CREATE_TEST_RUN_TEST_CASE: Operation = Operation::mutation("CreateTestRunTestCase", "createTestRunTestCase", r#"
mutation CreateTestRunTestCase($input: TestRunTestCaseCreateInput!) {
  createTestRunTestCase(input: $input)
}"#);

pub const DELETE_TEST_RUN: Operation = Operation::mutation("DeleteTestRun", "deleteTestRun", r#"
mutation DeleteTestRun($id: UUID!) {
  deleteTestRun(id: $id)
}"#);

// ----------------------------------------------------------------------------
// Test plans
// ----------------------------------------------------------------------------

pub const TEST_PLANS: Operation = Operation::query("TestPlansByProjectId", "testPlansByProjectId", r#"
query TestPlansByProjectId($projectId: UUID!, $filter: TestPlanFilterInput) {
  testPlansByProjectId(projectId: $projectId, filter: $filter) {
    nodes { id name description createdAt createdById testCasesCount }
  }
}"#);

pub const TEST_PLAN_BY_ID: Operation = Operation::query("TestPlanById", "testPlanById", r#"
query TestPlanById($id: UUID!) {
  testPlanById(id: $id) {
    id projectId name description createdAt updatedAt createdById
    testCases { id title priority severity }
  }
}"#);

pub const CREATE_TEST_PLAN: Operation = Operation::mutation("CreateTestPlan", "createTestPlan", r#"
mutation CreateTestPlan($input: TestPlanCreateInput!) {
  createTestPlan(input: $input)
}"#);

pub const DELETE_TEST_PLAN: Operation = Operation::mutation("DeleteTestPlan", "deleteTestPlan", r#"
mutation DeleteTestPlan($id: UUID!) {
  deleteTestPlan(id: $id)
}"#);

// ----------------------------------------------------------------------------
// Tags
// ----------------------------------------------------------------------------

pub const TAGS: Operation = Operation::query("Tags", "tags", r#"
query Tags($filter: TagFilterInput) {
  tags(filter: $filter) {
    nodes { id name createdAt }
  }
}"#);

pub const CREATE_TAG: Operation = Operation::mutation("CreateTag", "createTag", r#"
mutation CreateTag($input: TagCreateInput!) {
  createTag(input: $input)
}"#);

pub const UPDATE_TAG: Operation = Operation::mutation("UpdateTag", "updateTag", r#"
mutation UpdateTag($id: UUID!, $input: TagUpdateInput!) {
  updateTag(id: $id, input: $input)
}"#);

pub const DELETE_TAG: Operation = Operation::mutation("DeleteTag", "deleteTag", r#"
mutation DeleteTag($id: UUID!) {
  deleteTag(id: $id)
}"#);

// ----------------------------------------------------------------------------
// Adjuntos
// ----------------------------------------------------------------------------

pub const ATTACHMENTS: Operation = Operation::query("Attachments", "attachmentsByProjectId", r#"
query Attachments($projectId: UUID!, $filter: String) {
  attachmentsByProjectId(projectId: $projectId, where: { fileName: { contains: $filter } }) {
    nodes { id fileName contentType fileSize fileUrl uploadedById }
  }
}"#);
